//! Matrix palette assembly: the per-bone skinning matrices a vertex shader
//! consumes.

use ossein_math_core::Mat4;

use crate::error::PaletteError;
use crate::skeleton::Skeleton;

/// Upper bound on bones per skeleton, shared with the skinning shader's
/// uniform array size.
pub const MAX_SKELETON_BONES: usize = 96;

/// Fixed-capacity array of skinning matrices. Rebuilt every tick for each
/// instance and handed opaquely to the renderer for upload; never persisted.
#[derive(Clone, Debug)]
pub struct MatrixPalette {
    matrices: [Mat4; MAX_SKELETON_BONES],
}

impl MatrixPalette {
    pub fn new() -> Self {
        Self {
            matrices: [Mat4::IDENTITY; MAX_SKELETON_BONES],
        }
    }

    /// Combine the skeleton's inverse bind poses with freshly sampled global
    /// poses: `palette[i] = inv_bind[i] * global_pose[i]` (row-vector order,
    /// bind-space first). Entries past the pose count keep their previous
    /// contents.
    pub fn compute(
        &mut self,
        skeleton: &Skeleton,
        global_poses: &[Mat4],
    ) -> Result<(), PaletteError> {
        if global_poses.len() > MAX_SKELETON_BONES {
            return Err(PaletteError::TooManyBones {
                got: global_poses.len(),
                max: MAX_SKELETON_BONES,
            });
        }
        if global_poses.len() != skeleton.num_bones() {
            return Err(PaletteError::BoneCountMismatch {
                skeleton: skeleton.num_bones(),
                pose: global_poses.len(),
            });
        }
        let inv_bind = skeleton.global_inv_bind_poses();
        for (i, pose) in global_poses.iter().enumerate() {
            self.matrices[i] = inv_bind[i] * *pose;
        }
        Ok(())
    }

    #[inline]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }
}

impl Default for MatrixPalette {
    fn default() -> Self {
        Self::new()
    }
}
