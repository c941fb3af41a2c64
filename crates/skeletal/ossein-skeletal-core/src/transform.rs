//! Rigid bone-local transforms and their interpolation law.

use ossein_math_core::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A bone's local transform relative to its parent at one instant:
/// a unit quaternion rotation plus a translation. Immutable value type;
/// interpolation produces a new instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: BoneTransform = BoneTransform {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    #[inline]
    pub const fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Materialize as a row-vector matrix: rotation block, unit scale,
    /// translation in the fourth row.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_transform(1.0, self.translation, self.rotation)
    }

    /// Blend two transforms with mix factor `f` (0 yields `a`, 1 yields `b`).
    ///
    /// Translation lerps. Rotation is a sign-corrected linear quaternion
    /// blend: when `a . b < 0` the pair straddles the long arc, so `a`'s
    /// contribution is negated before blending and the result renormalized.
    /// Normalized lerp, not slerp; inter-frame deltas are small.
    pub fn interpolate(a: &BoneTransform, b: &BoneTransform, f: f32) -> BoneTransform {
        let bias = if a.rotation.dot(b.rotation) >= 0.0 {
            1.0
        } else {
            -1.0
        };
        let rotation = Quat::new(
            b.rotation.x * f + a.rotation.x * bias * (1.0 - f),
            b.rotation.y * f + a.rotation.y * bias * (1.0 - f),
            b.rotation.z * f + a.rotation.z * bias * (1.0 - f),
            b.rotation.w * f + a.rotation.w * bias * (1.0 - f),
        )
        .normalized();
        let translation = a.translation.lerp(b.translation, f);
        BoneTransform {
            rotation,
            translation,
        }
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    /// it should return the endpoints at f=0 and f=1 up to normalization
    #[test]
    fn interpolate_endpoints() {
        let a = BoneTransform::new(
            Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.4),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let b = BoneTransform::new(
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 1.2),
            Vec3::new(-1.0, 0.0, 5.0),
        );
        let at0 = BoneTransform::interpolate(&a, &b, 0.0);
        let at1 = BoneTransform::interpolate(&a, &b, 1.0);
        approx(at0.rotation.dot(a.rotation).abs(), 1.0, 1e-5);
        assert_eq!(at0.translation, a.translation);
        approx(at1.rotation.dot(b.rotation).abs(), 1.0, 1e-5);
        assert_eq!(at1.translation, b.translation);
    }

    /// it should keep the blended rotation unit length
    #[test]
    fn interpolate_unit_length() {
        let a = BoneTransform::new(
            Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.1),
            Vec3::ZERO,
        );
        let b = BoneTransform::new(
            Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 2.9),
            Vec3::ZERO,
        );
        for i in 0..=10 {
            let f = i as f32 / 10.0;
            let mid = BoneTransform::interpolate(&a, &b, f);
            approx(mid.rotation.length(), 1.0, 1e-5);
        }
    }

    /// it should take the shorter arc when the quaternions disagree in sign
    #[test]
    fn interpolate_shortest_arc() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.5);
        let a = BoneTransform::new(q, Vec3::ZERO);
        // Same rotation, opposite hypersphere hemisphere.
        let b = BoneTransform::new(Quat::new(-q.x, -q.y, -q.z, -q.w), Vec3::ZERO);
        let mid = BoneTransform::interpolate(&a, &b, 0.5);
        // A naive blend would collapse toward zero; the corrected blend
        // stays on the same rotation.
        approx(mid.rotation.dot(q).abs(), 1.0, 1e-5);
    }
}
