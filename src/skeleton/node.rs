use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::AnimationCycle;
use crate::errors::{MarrowError, Result};
use crate::skeleton::BoneKey;

/// A single joint in the skeletal hierarchy.
///
/// # Hierarchy
///
/// Nodes live in the [`Skeleton`](crate::skeleton::Skeleton)'s arena and
/// form a tree through keys:
/// - `parent`: back-reference for absolute-transform lookup, never owning
/// - `children`: ordered child keys; the order mirrors the loaded hierarchy
///   and keeps traversal and printing deterministic
///
/// # Transforms
///
/// Each node carries an immutable reference pose (the initial relative and
/// absolute transforms captured at load time) and a current pose that is
/// rewritten by updates. The invariant maintained after every hierarchy
/// pass: the absolute transform equals the relative transform composed with
/// the parent's absolute transform (identity composition at the root).
///
/// # Animation
///
/// A node maps integer cycle ids to owned [`AnimationCycle`]s. Not every
/// bone participates in every cycle; a node without the requested cycle
/// simply keeps its current relative transform.
#[derive(Debug, Clone)]
pub struct Node {
    // === Core Hierarchy ===
    pub(crate) parent: Option<BoneKey>,
    pub(crate) children: Vec<BoneKey>,
    pub(crate) level: u32,

    name: String,

    // === Reference pose ===
    initial_relative: Mat4,
    initial_absolute: Mat4,

    // === Current pose ===
    relative: Mat4,
    absolute: Mat4,
    absolute_position: Vec3,

    // === Skinning metadata (opaque to this core) ===
    offset: Option<Mat4>,
    bone_index: Option<usize>,

    // === Animation ===
    cycles: FxHashMap<u32, AnimationCycle>,
    last_time: f32,
}

impl Node {
    /// Creates a node from its reference pose. The current pose starts at
    /// the reference pose; parent, children, and level are wired when the
    /// node is attached to a [`Skeleton`](crate::skeleton::Skeleton).
    #[must_use]
    pub fn new(name: impl Into<String>, initial_relative: Mat4, initial_absolute: Mat4) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            level: 0,
            name: name.into(),
            initial_relative,
            initial_absolute,
            relative: initial_relative,
            absolute: initial_absolute,
            absolute_position: initial_absolute.transform_point3(Vec3::ZERO),
            offset: None,
            bone_index: None,
            cycles: FxHashMap::default(),
            last_time: 0.0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth from the root (the root is level 0).
    #[inline]
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<BoneKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Read-only slice of child keys, in hierarchy order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[BoneKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn relative_transform(&self) -> &Mat4 {
        &self.relative
    }

    #[inline]
    #[must_use]
    pub fn absolute_transform(&self) -> &Mat4 {
        &self.absolute
    }

    /// The absolute transform applied to the origin.
    #[inline]
    #[must_use]
    pub fn absolute_position(&self) -> Vec3 {
        self.absolute_position
    }

    #[inline]
    #[must_use]
    pub fn initial_relative_transform(&self) -> &Mat4 {
        &self.initial_relative
    }

    #[inline]
    #[must_use]
    pub fn initial_absolute_transform(&self) -> &Mat4 {
        &self.initial_absolute
    }

    /// Bone-offset matrix for skinning consumers, if one was set.
    #[inline]
    #[must_use]
    pub fn offset_transform(&self) -> Option<&Mat4> {
        self.offset.as_ref()
    }

    pub fn set_offset_transform(&mut self, offset: Mat4) {
        self.offset = Some(offset);
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> Option<usize> {
        self.bone_index
    }

    pub fn set_bone_index(&mut self, index: usize) {
        self.bone_index = Some(index);
    }

    /// Time of the most recent `apply_cycle`/`apply_blended` call.
    #[inline]
    #[must_use]
    pub fn last_time(&self) -> f32 {
        self.last_time
    }

    // ========================================================================
    // Animation data
    // ========================================================================

    /// Registers an empty cycle under `cycle_id`, replacing any previous
    /// cycle with that id. `duration` is in ticks.
    pub fn add_animation_cycle(&mut self, cycle_id: u32, duration: f32, ticks_per_second: f32) {
        self.cycles
            .insert(cycle_id, AnimationCycle::new(duration, ticks_per_second));
    }

    pub fn add_translation_keyframe(
        &mut self,
        cycle_id: u32,
        time: f32,
        translation: Vec3,
    ) -> Result<()> {
        self.cycle_mut(cycle_id)?
            .add_translation_keyframe(time, translation);
        Ok(())
    }

    pub fn add_rotation_keyframe(
        &mut self,
        cycle_id: u32,
        time: f32,
        rotation: Quat,
    ) -> Result<()> {
        self.cycle_mut(cycle_id)?.add_rotation_keyframe(time, rotation);
        Ok(())
    }

    pub fn add_scaling_keyframe(&mut self, cycle_id: u32, time: f32, scaling: Vec3) -> Result<()> {
        self.cycle_mut(cycle_id)?.add_scaling_keyframe(time, scaling);
        Ok(())
    }

    /// True iff this node has a cycle registered under `cycle_id`. This is
    /// the standard optionality test; absent ids are not an error.
    #[must_use]
    pub fn is_animated(&self, cycle_id: u32) -> bool {
        self.cycles.contains_key(&cycle_id)
    }

    #[must_use]
    pub fn animation_cycle(&self, cycle_id: u32) -> Option<&AnimationCycle> {
        self.cycles.get(&cycle_id)
    }

    fn cycle_mut(&mut self, cycle_id: u32) -> Result<&mut AnimationCycle> {
        self.cycles
            .get_mut(&cycle_id)
            .ok_or(MarrowError::CycleNotFound { cycle_id })
    }

    // ========================================================================
    // Pose evaluation (per node; traversal lives in `hierarchy`)
    // ========================================================================

    /// Single-cycle pose assignment: if this node is animated under
    /// `cycle_id`, the relative transform becomes that cycle's evaluated
    /// transform at `time`; otherwise the current pose persists (bones
    /// outside the active cycle stay static).
    pub fn apply_cycle(&mut self, time: f32, cycle_id: u32) {
        if let Some(cycle) = self.cycles.get_mut(&cycle_id) {
            self.relative = cycle.transform_at(time);
        }
        self.last_time = time;
    }

    /// Blended pose assignment: accumulates `weight * transform` over every
    /// weighted cycle this node carries, and adopts the sum as the new
    /// relative transform when it is non-zero (at least one cycle matched
    /// with a non-zero weight); otherwise the previous pose is retained.
    ///
    /// Summing raw matrices is only correct while the blended cycles
    /// animate disjoint bone subsets (upper vs. lower body). Two cycles
    /// driving the same bone non-trivially produce a non-orthonormal
    /// composite; that limitation is intended, not a bug.
    pub fn apply_blended(&mut self, time: f32, weights: &FxHashMap<u32, f32>) {
        let mut accumulated = Mat4::ZERO;
        for (&cycle_id, &weight) in weights {
            if let Some(cycle) = self.cycles.get_mut(&cycle_id) {
                accumulated += cycle.transform_at(time) * weight;
            }
        }
        if accumulated != Mat4::ZERO {
            self.relative = accumulated;
        }
        self.last_time = time;
    }

    /// Recomputes the cached absolute transform against the parent's
    /// already-final absolute transform (identity at the root).
    pub(crate) fn update_absolute(&mut self, parent_absolute: Mat4) {
        self.absolute = parent_absolute * self.relative;
        self.absolute_position = self.absolute.transform_point3(Vec3::ZERO);
    }

    // ========================================================================
    // Cloning
    // ========================================================================

    /// Deep-copies the reference pose into a new parentless node.
    ///
    /// The clone keeps the name, level, offset matrix, bone index, and
    /// last-evaluated time. Its current pose restarts from the initial
    /// relative transform, and with no parent its absolute transform equals
    /// that relative transform. Animation cycles are not copied: the clone
    /// reports `is_animated == false` for every cycle id.
    #[must_use]
    pub fn clone_detached(&self) -> Self {
        let mut clone = Self::new(self.name.clone(), self.initial_relative, self.initial_absolute);
        clone.level = self.level;
        clone.offset = self.offset;
        clone.bone_index = self.bone_index;
        clone.last_time = self.last_time;
        clone.update_absolute(Mat4::IDENTITY);
        clone
    }
}
