//! Error Types
//!
//! The runtime evaluation path (sampling, updates, blending) is infallible
//! by design: missing cycles, empty curves, and out-of-range times all have
//! local resolutions. [`MarrowError`] only covers the mistakes a loader can
//! make while building a skeleton.

use thiserror::Error;

/// The error type for skeleton construction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarrowError {
    /// A keyframe was added under a cycle id that was never registered
    /// on the node. Loaders must call `add_animation_cycle` first.
    #[error("Animation cycle not found on node: {cycle_id}")]
    CycleNotFound {
        /// The unregistered cycle id
        cycle_id: u32,
    },

    /// An attach referenced a bone key that is not in the skeleton's arena.
    #[error("Bone not found in skeleton")]
    BoneNotFound,
}

/// Alias for `Result<T, MarrowError>`.
pub type Result<T> = std::result::Result<T, MarrowError>;
