//! Animation clips: immutable per-bone keyframe tracks and pose sampling.

use ossein_math_core::Mat4;

use crate::skeleton::Skeleton;
use crate::transform::BoneTransform;

/// Per-bone track state. A bone either carries one keyframe per clip frame
/// or never animates in this clip and stays frozen at its bind pose.
#[derive(Clone, Debug)]
pub enum BoneTrack {
    Animated(Vec<BoneTransform>),
    Static,
}

impl BoneTrack {
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self, BoneTrack::Static)
    }
}

/// Immutable keyframed clip. Frames are evenly spaced: frame `k` occurs at
/// `k * length / (num_frames - 1)` seconds. Loaded once, shared by handle,
/// read-only thereafter.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    num_bones: usize,
    num_frames: usize,
    length: f32,
    tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    /// Assemble a clip from validated parts. `tracks` must hold one entry
    /// per bone, and every `Animated` track exactly `num_frames` transforms;
    /// the loader guarantees this for file-sourced clips.
    pub fn new(num_bones: usize, num_frames: usize, length: f32, tracks: Vec<BoneTrack>) -> Self {
        debug_assert!(num_frames >= 2);
        debug_assert!(length > 0.0);
        debug_assert_eq!(tracks.len(), num_bones);
        debug_assert!(tracks.iter().all(|t| match t {
            BoneTrack::Animated(frames) => frames.len() == num_frames,
            BoneTrack::Static => true,
        }));
        Self {
            num_bones,
            num_frames,
            length,
            tracks,
        }
    }

    #[inline]
    pub fn num_bones(&self) -> usize {
        self.num_bones
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Length in seconds.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn track(&self, bone: usize) -> Option<&BoneTrack> {
        self.tracks.get(bone)
    }

    /// Keyframe pair selection: the frame at or before `time` and the
    /// fraction toward the next one. `time` must stay below `length`
    /// (callers wrap `time == length` to 0); at the exact end there is no
    /// next frame to blend toward.
    #[inline]
    fn frame_at(&self, time: f32) -> (usize, f32) {
        let duration_per_frame = self.length / (self.num_frames - 1) as f32;
        let frame = (time / duration_per_frame) as usize;
        let f = (time - frame as f32 * duration_per_frame) / duration_per_frame;
        (frame, f)
    }

    #[inline]
    fn sample_track(frames: &[BoneTransform], frame: usize, f: f32) -> BoneTransform {
        BoneTransform::interpolate(&frames[frame], &frames[frame + 1], f)
    }

    /// Sample the clip at `time` into one global (root-space) pose matrix
    /// per bone, appended to `out` in bone order.
    ///
    /// `skeleton` must have the same bone count as the clip; `Playback`
    /// checks this before a clip ever reaches here.
    pub fn sample_global_pose(&self, out: &mut Vec<Mat4>, skeleton: &Skeleton, time: f32) {
        debug_assert!((0.0..self.length).contains(&time));
        out.clear();
        out.reserve(self.num_bones);

        let (frame, f) = self.frame_at(time);
        let inv_bind = skeleton.global_inv_bind_poses();

        // Ascending bone order: a parent's global pose is always in `out`
        // before any of its children need it.
        for (i, track) in self.tracks.iter().enumerate() {
            let global = match track {
                BoneTrack::Static => inv_bind[i].inverse(),
                BoneTrack::Animated(frames) => {
                    let local = Self::sample_track(frames, frame, f).to_matrix();
                    match skeleton.bones()[i].parent {
                        Some(p) => local * out[p],
                        None => local,
                    }
                }
            };
            out.push(global);
        }
    }

    /// Sample a cross-fade from `prev_clip` (at `prev_time`) toward this
    /// clip (at `time`) into one global pose matrix per bone.
    ///
    /// The mix is a smoothstep of `time / min(blend_duration, length)` and
    /// is deliberately not clamped: past the blend window the formula
    /// extrapolates beyond [0, 1]. The playback state machine drops the
    /// previous clip once the window elapses, so steady-state ticks never
    /// sample here with `t > 1`.
    pub fn sample_blended_global_pose(
        &self,
        out: &mut Vec<Mat4>,
        skeleton: &Skeleton,
        prev_clip: &AnimationClip,
        time: f32,
        prev_time: f32,
        blend_duration: f32,
    ) {
        debug_assert!((0.0..self.length).contains(&time));
        debug_assert!((0.0..prev_clip.length).contains(&prev_time));
        out.clear();
        out.reserve(self.num_bones);

        let (prev_frame, prev_f) = prev_clip.frame_at(prev_time);
        let (frame, f) = self.frame_at(time);

        let t = time / blend_duration.min(self.length);
        let blend_factor = t * t * (3.0 - 2.0 * t);

        let inv_bind = skeleton.global_inv_bind_poses();

        for (i, track) in self.tracks.iter().enumerate() {
            let global = match track {
                // Frozen in the incoming clip: hold the bind pose outright.
                BoneTrack::Static => inv_bind[i].inverse(),
                BoneTrack::Animated(frames) => {
                    let to = Self::sample_track(frames, frame, f);
                    let from = match &prev_clip.tracks[i] {
                        BoneTrack::Animated(prev_frames) => {
                            Self::sample_track(prev_frames, prev_frame, prev_f)
                        }
                        // The outgoing clip never moved this bone, so its
                        // side of the fade is the bind-pose local transform.
                        BoneTrack::Static => skeleton.bones()[i].local_bind_pose,
                    };
                    let local = BoneTransform::interpolate(&from, &to, blend_factor).to_matrix();
                    match skeleton.bones()[i].parent {
                        Some(p) => local * out[p],
                        None => local,
                    }
                }
            };
            out.push(global);
        }
    }
}
