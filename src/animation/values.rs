use glam::{Quat, Vec3};

/// Value types that can be interpolated between two keyframes.
///
/// The parameter `t` is always in `[0, 1]`. Each channel type carries its
/// own interpolation semantics through its impl: vectors and scalars lerp
/// component-wise, rotations take the shortest spherical path.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        // Shortest-path slerp; renormalize to guard against drift over
        // long keyframe sequences.
        start.slerp(end, t).normalize()
    }
}
