//! Skeletal hierarchy module
//!
//! - `Node`: one joint with its transforms and owned animation cycles
//! - `Skeleton`: arena owner, playback state machine, per-frame driver
//! - `hierarchy`: parent-before-child traversal passes

pub mod hierarchy;
pub mod node;
pub mod skeleton;

pub use node::Node;
pub use skeleton::{Playback, Skeleton};

use slotmap::new_key_type;

new_key_type! {
    /// Arena key identifying one bone within a [`Skeleton`].
    pub struct BoneKey;
}
