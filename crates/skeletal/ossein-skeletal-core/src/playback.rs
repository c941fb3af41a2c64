//! Per-instance playback state machine: idle, playing, or cross-fading.

use std::mem;
use std::sync::Arc;

use ossein_math_core::Mat4;

use crate::clip::AnimationClip;
use crate::error::{PaletteError, PlayError};
use crate::palette::{MatrixPalette, MAX_SKELETON_BONES};
use crate::skeleton::Skeleton;

#[derive(Clone, Debug)]
struct Active {
    clip: Arc<AnimationClip>,
    time: f32,
    rate: f32,
}

#[derive(Clone, Debug)]
enum State {
    Idle,
    Playing(Active),
    Blending {
        active: Active,
        prev: Arc<AnimationClip>,
        prev_time: f32,
        window: f32,
    },
}

/// Mutable playback state owned by one skeletal-mesh instance. The skeleton
/// and clips are shared immutable assets; everything mutable lives here, so
/// instances never need synchronization.
#[derive(Clone, Debug)]
pub struct Playback {
    skeleton: Arc<Skeleton>,
    state: State,
    // Pose scratch reused across ticks; one matrix per bone.
    pose: Vec<Mat4>,
}

impl Playback {
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        Self {
            skeleton,
            state: State::Idle,
            pose: Vec::new(),
        }
    }

    #[inline]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Start playing `clip` from time 0, returning its length.
    ///
    /// If a clip is already active it becomes the previous clip with its
    /// time snapshotted, and sampling cross-fades over `blend_duration`
    /// seconds. Bone-count mismatches against the skeleton and palette
    /// overflow are rejected up front.
    pub fn play(
        &mut self,
        clip: Arc<AnimationClip>,
        rate: f32,
        blend_duration: f32,
    ) -> Result<f32, PlayError> {
        if clip.num_bones() != self.skeleton.num_bones() {
            return Err(PlayError::BoneCountMismatch {
                skeleton: self.skeleton.num_bones(),
                clip: clip.num_bones(),
            });
        }
        if clip.num_bones() > MAX_SKELETON_BONES {
            return Err(PlayError::TooManyBones {
                got: clip.num_bones(),
                max: MAX_SKELETON_BONES,
            });
        }

        let length = clip.length();
        let active = Active {
            clip,
            time: 0.0,
            rate,
        };
        self.state = match mem::replace(&mut self.state, State::Idle) {
            State::Idle => State::Playing(active),
            // A fade already in flight restarts from the interrupted pose's
            // clip; the older previous clip is simply dropped.
            State::Playing(outgoing) | State::Blending {
                active: outgoing, ..
            } => State::Blending {
                prev: outgoing.clip,
                prev_time: outgoing.time,
                active,
                window: blend_duration,
            },
        };
        Ok(length)
    }

    /// Advance the active clip by `dt * rate` seconds: finish the blend once
    /// the window elapses, then wrap past the clip end (a single wrap per
    /// tick, enough for realistic frame rates).
    pub fn advance(&mut self, dt: f32) {
        self.state = match mem::replace(&mut self.state, State::Idle) {
            State::Idle => State::Idle,
            State::Playing(mut active) => {
                active.time += dt * active.rate;
                Self::wrap(&mut active);
                State::Playing(active)
            }
            State::Blending {
                mut active,
                prev,
                prev_time,
                window,
            } => {
                active.time += dt * active.rate;
                let blend_done = active.time >= window.min(active.clip.length());
                Self::wrap(&mut active);
                if blend_done {
                    State::Playing(active)
                } else {
                    State::Blending {
                        active,
                        prev,
                        prev_time,
                        window,
                    }
                }
            }
        };
    }

    fn wrap(active: &mut Active) {
        if active.time >= active.clip.length() {
            active.time -= active.clip.length();
        }
    }

    /// Sample the current (single or blended) global pose into the internal
    /// scratch buffer. Empty while idle.
    pub fn sample_pose(&mut self) -> &[Mat4] {
        match &self.state {
            State::Idle => self.pose.clear(),
            State::Playing(active) => {
                active
                    .clip
                    .sample_global_pose(&mut self.pose, &self.skeleton, active.time)
            }
            State::Blending {
                active,
                prev,
                prev_time,
                window,
            } => active.clip.sample_blended_global_pose(
                &mut self.pose,
                &self.skeleton,
                prev,
                active.time,
                *prev_time,
                *window,
            ),
        }
        &self.pose
    }

    /// One simulation tick: advance time, sample the pose, rebuild the
    /// palette. Leaves the palette untouched while idle.
    pub fn update(&mut self, dt: f32, palette: &mut MatrixPalette) -> Result<(), PaletteError> {
        self.advance(dt);
        if matches!(self.state, State::Idle) {
            return Ok(());
        }
        self.sample_pose();
        palette.compute(&self.skeleton, &self.pose)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    #[inline]
    pub fn is_blending(&self) -> bool {
        matches!(self.state, State::Blending { .. })
    }

    /// The clip currently driving the pose, if any.
    pub fn current_clip(&self) -> Option<&Arc<AnimationClip>> {
        match &self.state {
            State::Idle => None,
            State::Playing(active) | State::Blending { active, .. } => Some(&active.clip),
        }
    }

    /// Playback position within the current clip, 0 while idle.
    pub fn time(&self) -> f32 {
        match &self.state {
            State::Idle => 0.0,
            State::Playing(active) | State::Blending { active, .. } => active.time,
        }
    }
}
