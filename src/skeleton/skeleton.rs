use std::fmt;

use log::debug;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::AnimationCycle;
use crate::errors::{MarrowError, Result};
use crate::skeleton::BoneKey;
use crate::skeleton::hierarchy;
use crate::skeleton::node::Node;

/// Playback state driving [`Skeleton::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Playback {
    /// Poses frozen at their last evaluated value.
    Stopped,
    /// A single cycle played once; time clamps at the cycle's end.
    Playing { cycle_id: u32 },
    /// A single cycle wrapped modulo its duration.
    Looping { cycle_id: u32 },
    /// A weighted cycle set, wrapped modulo the longest member's duration.
    Blended { weights: FxHashMap<u32, f32> },
}

/// Owner of a bone tree and its playback state.
///
/// A skeleton is built once from parsed model data (see [`Skeleton::set_root`]
/// and [`Skeleton::attach`]), then driven once per frame with
/// [`Skeleton::update`]. Consumers read evaluated poses afterwards through
/// the node accessors; updates never run concurrently with reads.
///
/// Requesting a cycle id that no node carries is not an error: such bones
/// report [`Node::is_animated`] false and keep their pose. Sparse cycles
/// (only a subset of bones animated) are the normal case.
pub struct Skeleton {
    nodes: SlotMap<BoneKey, Node>,
    root: Option<BoneKey>,
    playback: Playback,
    animation_duration: f32,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            playback: Playback::Stopped,
            animation_duration: 0.0,
        }
    }

    // ========================================================================
    // Construction (loader-facing)
    // ========================================================================

    /// Installs `node` as the tree root, replacing any existing tree.
    pub fn set_root(&mut self, mut node: Node) -> BoneKey {
        self.nodes.clear();
        node.parent = None;
        node.level = 0;
        let key = self.nodes.insert(node);
        self.root = Some(key);
        key
    }

    /// Inserts `node` as the last child of `parent`, transferring ownership
    /// to the skeleton. Wires the parent back-reference and derives the
    /// child's level.
    pub fn attach(&mut self, mut node: Node, parent: BoneKey) -> Result<BoneKey> {
        let parent_level = self
            .nodes
            .get(parent)
            .ok_or(MarrowError::BoneNotFound)?
            .level;

        node.parent = Some(parent);
        node.level = parent_level + 1;
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        Ok(key)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<BoneKey> {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn node(&self, key: BoneKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn node_mut(&mut self, key: BoneKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneKey, &Node)> {
        self.nodes.iter()
    }

    /// Depth-first search by name, following child order; first match wins.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<BoneKey> {
        self.root.and_then(|root| self.find_in(root, name))
    }

    fn find_in(&self, current: BoneKey, name: &str) -> Option<BoneKey> {
        let node = self.nodes.get(current)?;
        if node.name() == name {
            return Some(current);
        }
        for &child in &node.children {
            if let Some(found) = self.find_in(child, name) {
                return Some(found);
            }
        }
        None
    }

    // ========================================================================
    // Playback control (driver-facing)
    // ========================================================================

    /// Plays `cycle_id` once; update times clamp at the cycle's end.
    pub fn play_anim(&mut self, cycle_id: u32) {
        self.animation_duration = self.cycle_duration_seconds(cycle_id);
        self.playback = Playback::Playing { cycle_id };
        debug!(
            "playback: playing cycle {cycle_id} ({:.2}s)",
            self.animation_duration
        );
    }

    /// Loops `cycle_id`; update times wrap modulo the cycle's duration.
    pub fn loop_anim(&mut self, cycle_id: u32) {
        self.animation_duration = self.cycle_duration_seconds(cycle_id);
        self.playback = Playback::Looping { cycle_id };
        debug!(
            "playback: looping cycle {cycle_id} ({:.2}s)",
            self.animation_duration
        );
    }

    /// Freezes every bone at its last evaluated pose.
    pub fn stop(&mut self) {
        self.playback = Playback::Stopped;
        debug!("playback: stopped");
    }

    /// Switches to blended playback over a weighted cycle set.
    ///
    /// Weights are raw multipliers; they are not normalized here, and the
    /// blend is only meaningful for cycles animating disjoint bone subsets
    /// (see [`Node::apply_blended`]). The blended duration is the union
    /// (maximum) of the members' durations.
    pub fn set_blended_cycles(&mut self, weights: impl IntoIterator<Item = (u32, f32)>) {
        let weights: FxHashMap<u32, f32> = weights.into_iter().collect();
        self.animation_duration = weights
            .keys()
            .map(|&id| self.cycle_duration_seconds(id))
            .fold(0.0, f32::max);
        debug!(
            "playback: blending {} cycles ({:.2}s)",
            weights.len(),
            self.animation_duration
        );
        self.playback = Playback::Blended { weights };
    }

    #[inline]
    #[must_use]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Duration in seconds of the active cycle (or the union of the
    /// blended set). Zero while stopped or when no node carries the cycle.
    #[inline]
    #[must_use]
    pub fn animation_duration(&self) -> f32 {
        self.animation_duration
    }

    /// Longest duration among this tree's cycles registered under
    /// `cycle_id` (cycles are per node; bones may disagree on length, the
    /// longest wins).
    #[must_use]
    pub fn cycle_duration_seconds(&self, cycle_id: u32) -> f32 {
        self.nodes
            .values()
            .filter_map(|node| node.animation_cycle(cycle_id))
            .map(AnimationCycle::duration_seconds)
            .fold(0.0, f32::max)
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Advances the whole tree to `elapsed_seconds`.
    ///
    /// The elapsed time is mapped to cycle-local time according to the
    /// playback state (clamped when playing once, wrapped when looping or
    /// blending, ignored when stopped), then a full top-down pass
    /// re-evaluates poses and absolute transforms. The result depends only
    /// on `elapsed_seconds` and the current state: calling twice with the
    /// same argument yields identical transforms.
    pub fn update(&mut self, elapsed_seconds: f32) {
        let Some(root) = self.root else {
            return;
        };

        match &self.playback {
            Playback::Stopped => hierarchy::refresh_hierarchy(&mut self.nodes, root),
            Playback::Playing { cycle_id } => {
                let time = elapsed_seconds.clamp(0.0, self.animation_duration);
                hierarchy::update_hierarchy(&mut self.nodes, root, time, *cycle_id);
            }
            Playback::Looping { cycle_id } => {
                let time = wrap_time(elapsed_seconds, self.animation_duration);
                hierarchy::update_hierarchy(&mut self.nodes, root, time, *cycle_id);
            }
            Playback::Blended { weights } => {
                let time = wrap_time(elapsed_seconds, self.animation_duration);
                hierarchy::blend_hierarchy(&mut self.nodes, root, time, weights);
            }
        }
    }
}

/// Wraps elapsed time into `[0, duration)`; degenerate durations pin to 0.
fn wrap_time(elapsed: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        elapsed.rem_euclid(duration)
    } else {
        0.0
    }
}

impl fmt::Display for Skeleton {
    /// One line per node in traversal order, indented by level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn print_node(
            skeleton: &Skeleton,
            key: BoneKey,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let Some(node) = skeleton.nodes.get(key) else {
                return Ok(());
            };
            let indent = node.level() as usize * 2;
            write!(f, "{:indent$}{}", "", node.name())?;
            if let Some(index) = node.bone_index() {
                write!(f, " (bone {index})")?;
            }
            writeln!(f)?;
            for &child in node.children() {
                print_node(skeleton, child, f)?;
            }
            Ok(())
        }

        match self.root {
            Some(root) => print_node(self, root, f),
            None => writeln!(f, "<empty skeleton>"),
        }
    }
}
