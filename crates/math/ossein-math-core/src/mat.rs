//! Row-major 4x4 matrices, row-vector convention.
//!
//! A point transforms as `row-vector * matrix`, so composition reads left to
//! right: `local * parent` takes a bone-local point to parent space first.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::quat::Quat;
use crate::vec::{Vec3, Vec4};

/// Reciprocal as a fast estimate refined by one Newton-Raphson iteration,
/// mirroring the hardware `rcp` + refine sequence lane for lane.
#[inline]
fn recip_refined(x: f32) -> f32 {
    let est = 1.0 / x;
    est + est - x * est * est
}

/// 4x4 matrix stored as four row vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub rows: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        rows: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    #[inline]
    pub const fn from_rows(rows: [Vec4; 4]) -> Self {
        Self { rows }
    }

    /// Uniform scale matrix.
    #[inline]
    pub fn from_scale(scale: f32) -> Self {
        Self::from_rows([
            Vec4::new(scale, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ])
    }

    /// Translation matrix (translation in the fourth row).
    #[inline]
    pub fn from_translation(trans: Vec3) -> Self {
        Self::from_rows([
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::from_vec3(trans, 1.0),
        ])
    }

    /// Rotation matrix from a unit quaternion.
    #[inline]
    pub fn from_quaternion(q: Quat) -> Self {
        Self::from_transform(1.0, Vec3::ZERO, q)
    }

    /// Scale-rotate-translate matrix: the standard quaternion rotation block
    /// with each upper row scaled uniformly and the translation in row 3.
    pub fn from_transform(scale: f32, trans: Vec3, q: Quat) -> Self {
        let r0 = Vec4::new(
            1.0 - 2.0 * (q.y * q.y + q.z * q.z),
            2.0 * (q.x * q.y + q.w * q.z),
            2.0 * (q.x * q.z - q.w * q.y),
            0.0,
        );
        let r1 = Vec4::new(
            2.0 * (q.x * q.y - q.w * q.z),
            1.0 - 2.0 * (q.x * q.x + q.z * q.z),
            2.0 * (q.y * q.z + q.w * q.x),
            0.0,
        );
        let r2 = Vec4::new(
            2.0 * (q.x * q.z + q.w * q.y),
            2.0 * (q.y * q.z - q.w * q.x),
            1.0 - 2.0 * (q.x * q.x + q.y * q.y),
            0.0,
        );
        Self::from_rows([
            r0 * scale,
            r1 * scale,
            r2 * scale,
            Vec4::from_vec3(trans, 1.0),
        ])
    }

    #[inline]
    pub fn transposed(&self) -> Mat4 {
        let m = &self.rows;
        Mat4::from_rows([
            Vec4::new(m[0].x, m[1].x, m[2].x, m[3].x),
            Vec4::new(m[0].y, m[1].y, m[2].y, m[3].y),
            Vec4::new(m[0].z, m[1].z, m[2].z, m[3].z),
            Vec4::new(m[0].w, m[1].w, m[2].w, m[3].w),
        ])
    }

    /// Determinant via the same row-pairwise sub-determinants the inverse
    /// uses: a dot of row 0's cofactors against row 0.
    pub fn determinant(&self) -> f32 {
        let m = &self.rows;
        let s0 = m[0].x * m[1].y - m[1].x * m[0].y;
        let s1 = m[0].x * m[1].z - m[1].x * m[0].z;
        let s2 = m[0].x * m[1].w - m[1].x * m[0].w;
        let s3 = m[0].y * m[1].z - m[1].y * m[0].z;
        let s4 = m[0].y * m[1].w - m[1].y * m[0].w;
        let s5 = m[0].z * m[1].w - m[1].z * m[0].w;

        let c5 = m[2].z * m[3].w - m[3].z * m[2].w;
        let c4 = m[2].y * m[3].w - m[3].y * m[2].w;
        let c3 = m[2].y * m[3].z - m[3].y * m[2].z;
        let c2 = m[2].x * m[3].w - m[3].x * m[2].w;
        let c1 = m[2].x * m[3].z - m[3].x * m[2].z;
        let c0 = m[2].x * m[3].y - m[3].x * m[2].y;

        s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
    }

    /// Cofactor/adjugate inverse. Minor vectors are built from row-pairwise
    /// 2x2 sub-determinant products, the determinant is a dot of row 0 with
    /// its minor, and every minor is scaled by the refined reciprocal.
    ///
    /// There is no singularity check: a near-zero determinant yields a
    /// numerically unstable or garbage inverse. Known limitation.
    pub fn inverse(&self) -> Mat4 {
        let m = &self.rows;
        let s0 = m[0].x * m[1].y - m[1].x * m[0].y;
        let s1 = m[0].x * m[1].z - m[1].x * m[0].z;
        let s2 = m[0].x * m[1].w - m[1].x * m[0].w;
        let s3 = m[0].y * m[1].z - m[1].y * m[0].z;
        let s4 = m[0].y * m[1].w - m[1].y * m[0].w;
        let s5 = m[0].z * m[1].w - m[1].z * m[0].w;

        let c5 = m[2].z * m[3].w - m[3].z * m[2].w;
        let c4 = m[2].y * m[3].w - m[3].y * m[2].w;
        let c3 = m[2].y * m[3].z - m[3].y * m[2].z;
        let c2 = m[2].x * m[3].w - m[3].x * m[2].w;
        let c1 = m[2].x * m[3].z - m[3].x * m[2].z;
        let c0 = m[2].x * m[3].y - m[3].x * m[2].y;

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        let rcp = recip_refined(det);

        let minor0 = Vec4::new(
            m[1].y * c5 - m[1].z * c4 + m[1].w * c3,
            -m[0].y * c5 + m[0].z * c4 - m[0].w * c3,
            m[3].y * s5 - m[3].z * s4 + m[3].w * s3,
            -m[2].y * s5 + m[2].z * s4 - m[2].w * s3,
        );
        let minor1 = Vec4::new(
            -m[1].x * c5 + m[1].z * c2 - m[1].w * c1,
            m[0].x * c5 - m[0].z * c2 + m[0].w * c1,
            -m[3].x * s5 + m[3].z * s2 - m[3].w * s1,
            m[2].x * s5 - m[2].z * s2 + m[2].w * s1,
        );
        let minor2 = Vec4::new(
            m[1].x * c4 - m[1].y * c2 + m[1].w * c0,
            -m[0].x * c4 + m[0].y * c2 - m[0].w * c0,
            m[3].x * s4 - m[3].y * s2 + m[3].w * s0,
            -m[2].x * s4 + m[2].y * s2 - m[2].w * s0,
        );
        let minor3 = Vec4::new(
            -m[1].x * c3 + m[1].y * c1 - m[1].z * c0,
            m[0].x * c3 - m[0].y * c1 + m[0].z * c0,
            -m[3].x * s3 + m[3].y * s1 - m[3].z * s0,
            m[2].x * s3 - m[2].y * s1 + m[2].z * s0,
        );

        Mat4::from_rows([minor0 * rcp, minor1 * rcp, minor2 * rcp, minor3 * rcp])
    }

    /// Homogeneous transform of a 3-vector with an explicit `w` (1 for
    /// points, 0 for directions): transpose, augment, four dot products.
    #[inline]
    pub fn transform(&self, v: Vec3, w: f32) -> Vec3 {
        let t = self.transposed();
        let hv = Vec4::from_vec3(v, w);
        Vec3::new(hv.dot(t.rows[0]), hv.dot(t.rows[1]), hv.dot(t.rows[2]))
    }

    #[inline]
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        self.transform(v, 1.0)
    }

    #[inline]
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        self.transform(v, 0.0)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Row-vector product: `C[i] = sum_k A[i][k] * B[k]`, each element of a row
/// of `A` broadcast against the matching row of `B`.
impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut rows = [Vec4::ZERO; 4];
        for (out, a) in rows.iter_mut().zip(self.rows.iter()) {
            *out = rhs.rows[0] * a.x + rhs.rows[1] * a.y + rhs.rows[2] * a.z + rhs.rows[3] * a.w;
        }
        Mat4 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    fn mat_approx(a: &Mat4, b: &Mat4, eps: f32) {
        for (ra, rb) in a.rows.iter().zip(b.rows.iter()) {
            approx(ra.x, rb.x, eps);
            approx(ra.y, rb.y, eps);
            approx(ra.z, rb.z, eps);
            approx(ra.w, rb.w, eps);
        }
    }

    /// it should treat identity as the multiplicative unit
    #[test]
    fn identity_unit() {
        let m = Mat4::from_transform(
            2.0,
            Vec3::new(1.0, -2.0, 3.0),
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7),
        );
        mat_approx(&(m * Mat4::IDENTITY), &m, 0.0);
        mat_approx(&(Mat4::IDENTITY * m), &m, 0.0);
    }

    /// it should compose translations left to right in row-vector order
    #[test]
    fn translation_composition() {
        let a = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let b = Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let c = a * b;
        assert_eq!(c.rows[3], Vec4::new(1.0, 2.0, 0.0, 1.0));
    }

    /// it should invert a well-conditioned matrix back to identity
    #[test]
    fn inverse_round_trip() {
        let m = Mat4::from_transform(
            1.5,
            Vec3::new(-4.0, 2.5, 7.0),
            Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 1.1),
        );
        mat_approx(&(m * m.inverse()), &Mat4::IDENTITY, 1e-4);
        mat_approx(&(m.inverse() * m), &Mat4::IDENTITY, 1e-4);
    }

    /// it should compute the determinant of scale matrices exactly
    #[test]
    fn determinant_scale() {
        approx(Mat4::IDENTITY.determinant(), 1.0, 0.0);
        approx(Mat4::from_scale(2.0).determinant(), 8.0, 1e-6);
    }

    /// it should match the quaternion rotation block for a 90 degree turn
    #[test]
    fn quaternion_block() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), std::f32::consts::FRAC_PI_2);
        let m = Mat4::from_quaternion(q);
        // x axis maps to y axis under a +90 degree turn about z
        let mapped = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        approx(mapped.x, 0.0, 1e-6);
        approx(mapped.y, 1.0, 1e-6);
        approx(mapped.z, 0.0, 1e-6);
    }

    /// it should apply translation to points but not to directions
    #[test]
    fn point_vs_direction() {
        let m = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(v), Vec3::new(6.0, 2.0, 3.0));
        assert_eq!(m.transform_direction(v), v);
    }

    /// it should agree with transform composition when transforming through
    /// a product of matrices
    #[test]
    fn transform_through_product() {
        let r = Mat4::from_quaternion(Quat::from_axis_angle(
            Vec3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_2,
        ));
        let t = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0));
        let rt = r * t;
        let p = Vec3::new(1.0, 0.0, 0.0);
        let once = rt.transform_point(p);
        let twice = t.transform_point(r.transform_point(p));
        approx(once.x, twice.x, 1e-6);
        approx(once.y, twice.y, 1e-6);
        approx(once.z, twice.z, 1e-6);
    }
}
