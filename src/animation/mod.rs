pub mod curve;
pub mod cycle;
pub mod values;

pub use curve::{KeyframeCursor, KeyframeCurve};
pub use cycle::AnimationCycle;
pub use values::Interpolatable;
