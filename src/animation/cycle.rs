use glam::{Mat4, Quat, Vec3};

use crate::animation::curve::{KeyframeCurve, KeyframeCursor};

/// Importer convention for files that leave ticks-per-second unset.
const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

#[derive(Debug, Clone, Copy, Default)]
struct ChannelCursors {
    translation: KeyframeCursor,
    rotation: KeyframeCursor,
    scaling: KeyframeCursor,
}

/// One named animation for a single bone.
///
/// A cycle bundles a keyframe curve per transform channel (translation,
/// rotation, scaling; any subset may be empty) together with the timing
/// metadata that maps real seconds onto the curves' tick timeline. Cycles
/// are owned exclusively by their [`Node`](crate::skeleton::Node) and
/// addressed by an integer cycle id unique within that node.
#[derive(Debug, Clone)]
pub struct AnimationCycle {
    duration: f32,
    ticks_per_second: f32,
    translation: KeyframeCurve<Vec3>,
    rotation: KeyframeCurve<Quat>,
    scaling: KeyframeCurve<Vec3>,
    cursors: ChannelCursors,
}

impl AnimationCycle {
    /// Creates an empty cycle. `duration` is in ticks; a non-positive
    /// `ticks_per_second` falls back to 25.
    #[must_use]
    pub fn new(duration: f32, ticks_per_second: f32) -> Self {
        let ticks_per_second = if ticks_per_second > 0.0 {
            ticks_per_second
        } else {
            DEFAULT_TICKS_PER_SECOND
        };
        Self {
            duration,
            ticks_per_second,
            translation: KeyframeCurve::new(),
            rotation: KeyframeCurve::new(),
            scaling: KeyframeCurve::new(),
            cursors: ChannelCursors::default(),
        }
    }

    pub fn add_translation_keyframe(&mut self, time: f32, translation: Vec3) {
        self.translation.add_keyframe(time, translation);
    }

    pub fn add_rotation_keyframe(&mut self, time: f32, rotation: Quat) {
        self.rotation.add_keyframe(time, rotation);
    }

    pub fn add_scaling_keyframe(&mut self, time: f32, scaling: Vec3) {
        self.scaling.add_keyframe(time, scaling);
    }

    /// Cycle length in ticks.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Cycle length in real seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration / self.ticks_per_second
    }

    /// Evaluates all three channels at `seconds` and composes them in the
    /// fixed order scale, rotate, translate.
    ///
    /// Empty channels contribute their identity (unit scale, identity
    /// rotation, zero translation). Mutable only to advance the channel
    /// cursors; the result is independent of cursor state.
    pub fn transform_at(&mut self, seconds: f32) -> Mat4 {
        let ticks = seconds * self.ticks_per_second;

        let translation = self
            .translation
            .sample_with_cursor(ticks, &mut self.cursors.translation)
            .unwrap_or(Vec3::ZERO);
        let rotation = self
            .rotation
            .sample_with_cursor(ticks, &mut self.cursors.rotation)
            .unwrap_or(Quat::IDENTITY);
        let scaling = self
            .scaling
            .sample_with_cursor(ticks, &mut self.cursors.scaling)
            .unwrap_or(Vec3::ONE);

        Mat4::from_scale_rotation_translation(scaling, rotation, translation)
    }
}
