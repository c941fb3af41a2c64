//! ossein-skeletal-core (engine-agnostic)
//!
//! Samples keyframed bone transforms, composes them through the
//! parent-child hierarchy into global poses, cross-fades between clips, and
//! assembles the per-bone matrix palette a skinning shader consumes. The
//! host engine owns rendering, asset discovery, and the component tick loop;
//! this crate owns everything between "clip + time" and "palette".

pub mod clip;
pub mod error;
pub mod library;
pub mod loader;
pub mod palette;
pub mod playback;
pub mod skeleton;
pub mod transform;

// Re-exports for consumers (adapters)
pub use clip::{AnimationClip, BoneTrack};
pub use error::{LoadError, PaletteError, PlayError};
pub use library::AssetLibrary;
pub use loader::{parse_clip_json, parse_skeleton_json};
pub use palette::{MatrixPalette, MAX_SKELETON_BONES};
pub use playback::Playback;
pub use skeleton::{Bone, Skeleton};
pub use transform::BoneTransform;
