//! Error types for asset loading and playback preconditions.

/// Load-time failures. All recoverable: the asset stays unavailable and the
/// caller moves on.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown format: expected {expected} version {expected_version}, got {ty:?} version {version}")]
    UnknownFormat {
        expected: &'static str,
        expected_version: u32,
        ty: String,
        version: u32,
    },

    #[error("clip needs at least 2 frames, got {0}")]
    TooFewFrames(usize),

    #[error("clip length must be positive, got {0}")]
    NonPositiveLength(f32),

    #[error("track for bone {bone} has {got} transforms, expected {expected}")]
    TrackLengthMismatch {
        bone: usize,
        got: usize,
        expected: usize,
    },

    #[error("bone index {bone} out of range for bone count {num_bones}")]
    BoneIndexOutOfRange { bone: usize, num_bones: usize },

    #[error("more than one track targets bone {0}")]
    DuplicateTrack(usize),

    #[error("bone count {got} exceeds the palette capacity {max}")]
    TooManyBones { got: usize, max: usize },

    #[error("skeleton declares {declared} bones but contains {got}")]
    BoneCountMismatch { declared: usize, got: usize },

    #[error("bone {bone} references parent {parent}; bones must be stored parent before child")]
    NonTopologicalOrder { bone: usize, parent: usize },

    #[error("bone {0} has no parent; only bone 0 may be the root")]
    UnexpectedRoot(usize),

    #[error("skeleton has no bones")]
    EmptySkeleton,
}

/// Precondition violations surfaced by [`crate::Playback::play`]. These are
/// caller bugs, reported as values instead of corrupting the hot path.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    #[error("skeleton has {skeleton} bones but the clip animates {clip}")]
    BoneCountMismatch { skeleton: usize, clip: usize },

    #[error("clip animates {got} bones, palette capacity is {max}")]
    TooManyBones { got: usize, max: usize },
}

/// Precondition violations surfaced by [`crate::MatrixPalette::compute`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteError {
    #[error("pose has {got} bones, palette capacity is {max}")]
    TooManyBones { got: usize, max: usize },

    #[error("skeleton has {skeleton} bones but the pose has {pose}")]
    BoneCountMismatch { skeleton: usize, pose: usize },
}
