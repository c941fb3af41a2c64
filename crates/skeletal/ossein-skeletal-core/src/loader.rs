//! Parsers for the `itpanim` clip format and the `itpskel` skeleton format.
//!
//! Both parse into private serde raw structs first, then validate every
//! cross-field invariant before any core type is built. Any mismatch is a
//! typed [`LoadError`]; nothing partially constructed escapes.

use ossein_math_core::{Quat, Vec3};
use serde::Deserialize;

use crate::clip::{AnimationClip, BoneTrack};
use crate::error::LoadError;
use crate::palette::MAX_SKELETON_BONES;
use crate::skeleton::{Bone, Skeleton};
use crate::transform::BoneTransform;

pub const CLIP_FORMAT: &str = "itpanim";
pub const CLIP_VERSION: u32 = 2;
pub const SKELETON_FORMAT: &str = "itpskel";
pub const SKELETON_VERSION: u32 = 1;

/// Parse an `itpanim` version 2 document into a clip.
pub fn parse_clip_json(s: &str) -> Result<AnimationClip, LoadError> {
    let doc: RawClipDoc = serde_json::from_str(s)?;
    check_format(&doc.metadata, CLIP_FORMAT, CLIP_VERSION)?;

    let num_frames = doc.sequence.frames as usize;
    if num_frames < 2 {
        return Err(LoadError::TooFewFrames(num_frames));
    }
    let length = doc.sequence.length;
    if !(length > 0.0) {
        return Err(LoadError::NonPositiveLength(length));
    }
    let num_bones = doc.sequence.bonecount as usize;
    if num_bones > MAX_SKELETON_BONES {
        return Err(LoadError::TooManyBones {
            got: num_bones,
            max: MAX_SKELETON_BONES,
        });
    }

    // Bones without a track stay Static (frozen at bind pose).
    let mut tracks: Vec<BoneTrack> = (0..num_bones).map(|_| BoneTrack::Static).collect();
    for raw in doc.sequence.tracks {
        let bone = raw.bone as usize;
        if bone >= num_bones {
            return Err(LoadError::BoneIndexOutOfRange { bone, num_bones });
        }
        if !tracks[bone].is_static() {
            return Err(LoadError::DuplicateTrack(bone));
        }
        if raw.transforms.len() != num_frames {
            return Err(LoadError::TrackLengthMismatch {
                bone,
                got: raw.transforms.len(),
                expected: num_frames,
            });
        }
        let frames = raw.transforms.iter().map(to_bone_transform).collect();
        tracks[bone] = BoneTrack::Animated(frames);
    }

    Ok(AnimationClip::new(num_bones, num_frames, length, tracks))
}

/// Parse an `itpskel` version 1 document into a skeleton, verifying the
/// parent-before-child storage order the pose samplers rely on.
pub fn parse_skeleton_json(s: &str) -> Result<Skeleton, LoadError> {
    let doc: RawSkeletonDoc = serde_json::from_str(s)?;
    check_format(&doc.metadata, SKELETON_FORMAT, SKELETON_VERSION)?;

    let declared = doc.bonecount as usize;
    if doc.bones.len() != declared {
        return Err(LoadError::BoneCountMismatch {
            declared,
            got: doc.bones.len(),
        });
    }
    if doc.bones.is_empty() {
        return Err(LoadError::EmptySkeleton);
    }
    if declared > MAX_SKELETON_BONES {
        return Err(LoadError::TooManyBones {
            got: declared,
            max: MAX_SKELETON_BONES,
        });
    }

    let mut bones = Vec::with_capacity(doc.bones.len());
    for (i, raw) in doc.bones.into_iter().enumerate() {
        let parent = if raw.parent < 0 {
            if i != 0 {
                return Err(LoadError::UnexpectedRoot(i));
            }
            None
        } else {
            let parent = raw.parent as usize;
            if parent >= i {
                return Err(LoadError::NonTopologicalOrder { bone: i, parent });
            }
            Some(parent)
        };
        bones.push(Bone {
            name: raw.name,
            parent,
            local_bind_pose: to_bone_transform(&raw.bindpose),
        });
    }

    Ok(Skeleton::new(bones))
}

fn check_format(
    metadata: &RawMetadata,
    expected: &'static str,
    expected_version: u32,
) -> Result<(), LoadError> {
    if metadata.ty != expected || metadata.version != expected_version {
        return Err(LoadError::UnknownFormat {
            expected,
            expected_version,
            ty: metadata.ty.clone(),
            version: metadata.version,
        });
    }
    Ok(())
}

fn to_bone_transform(raw: &RawTransform) -> BoneTransform {
    BoneTransform::new(
        Quat::new(raw.rot[0], raw.rot[1], raw.rot[2], raw.rot[3]),
        Vec3::new(raw.trans[0], raw.trans[1], raw.trans[2]),
    )
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(rename = "type")]
    ty: String,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct RawClipDoc {
    metadata: RawMetadata,
    sequence: RawSequence,
}

#[derive(Debug, Deserialize)]
struct RawSequence {
    frames: u32,
    length: f32,
    bonecount: u32,
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    bone: u32,
    transforms: Vec<RawTransform>,
}

#[derive(Debug, Deserialize)]
struct RawTransform {
    rot: [f32; 4],
    trans: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct RawSkeletonDoc {
    metadata: RawMetadata,
    bonecount: u32,
    bones: Vec<RawBone>,
}

#[derive(Debug, Deserialize)]
struct RawBone {
    name: String,
    parent: i64,
    bindpose: RawTransform,
}
