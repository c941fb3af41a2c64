//! ossein-math-core: row-vector vector/matrix/quaternion math.
//!
//! Everything here is a pure value transform with an exact scalar formula,
//! written in lane form so the compiler can vectorize the hot paths. Points
//! transform as `row-vector * matrix`; matrices compose left to right
//! (`local * parent`).

pub mod mat;
pub mod quat;
pub mod vec;

pub use mat::Mat4;
pub use quat::Quat;
pub use vec::{Vec3, Vec4};
