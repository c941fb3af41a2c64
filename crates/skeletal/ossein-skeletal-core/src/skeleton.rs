//! Immutable bind-pose hierarchy with cached global inverse bind poses.

use ossein_math_core::Mat4;
use serde::{Deserialize, Serialize};

use crate::transform::BoneTransform;

/// One node of the hierarchy. `parent` is `None` only for the root (bone 0).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub local_bind_pose: BoneTransform,
}

/// Bind-pose skeleton, shared by reference across every instance animating
/// with it and never mutated after construction.
///
/// Bones are stored in topological order: a bone's parent index is always
/// smaller than its own index. The loader enforces this; direct construction
/// is expected to uphold it (checked only in debug builds).
#[derive(Clone, Debug)]
pub struct Skeleton {
    bones: Vec<Bone>,
    global_inv_bind_poses: Vec<Mat4>,
}

impl Skeleton {
    /// Build a skeleton and precompute its global inverse bind poses by
    /// composing each local bind pose onto the parent's already-computed
    /// global bind pose, then inverting per bone.
    pub fn new(bones: Vec<Bone>) -> Self {
        let mut globals: Vec<Mat4> = Vec::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            let local = bone.local_bind_pose.to_matrix();
            let global = match bone.parent {
                Some(p) => {
                    debug_assert!(p < i, "bone {i} precedes its parent {p}");
                    local * globals[p]
                }
                None => local,
            };
            globals.push(global);
        }
        let global_inv_bind_poses = globals.iter().map(Mat4::inverse).collect();
        Self {
            bones,
            global_inv_bind_poses,
        }
    }

    #[inline]
    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    /// `None` when `i` is out of range.
    #[inline]
    pub fn bone(&self, i: usize) -> Option<&Bone> {
        self.bones.get(i)
    }

    #[inline]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// One inverse bind-pose matrix per bone, in bone order.
    #[inline]
    pub fn global_inv_bind_poses(&self) -> &[Mat4] {
        &self.global_inv_bind_poses
    }
}
