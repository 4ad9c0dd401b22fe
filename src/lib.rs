pub mod animation;
pub mod errors;
pub mod skeleton;
pub mod utils;

pub use animation::{AnimationCycle, Interpolatable, KeyframeCursor, KeyframeCurve};
pub use errors::MarrowError;
pub use skeleton::{BoneKey, Node, Playback, Skeleton};
pub use utils::Timer;
