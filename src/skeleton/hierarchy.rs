//! Hierarchy traversal passes.
//!
//! Every pass walks the tree in depth-first pre-order with an explicit
//! stack, so a parent's absolute transform is final before any child reads
//! it. That ordering is a correctness precondition of the data model, not a
//! performance choice: each child composes directly against its parent's
//! current absolute transform. The explicit stack also keeps deep chains
//! from overflowing the call stack.
//!
//! The passes borrow only the node arena, decoupled from
//! [`Skeleton`](crate::skeleton::Skeleton) to avoid borrow conflicts with
//! its playback state.

use glam::Mat4;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::skeleton::BoneKey;
use crate::skeleton::node::Node;

/// Single-cycle update: assigns each node's pose from `cycle_id` at `time`
/// (nodes without the cycle keep their pose), then recomputes absolute
/// transforms top-down.
pub fn update_hierarchy(
    nodes: &mut SlotMap<BoneKey, Node>,
    root: BoneKey,
    time: f32,
    cycle_id: u32,
) {
    walk(nodes, root, |node| node.apply_cycle(time, cycle_id));
}

/// Blended update: assigns each node's pose from the weighted cycle set,
/// then recomputes absolute transforms top-down.
pub fn blend_hierarchy(
    nodes: &mut SlotMap<BoneKey, Node>,
    root: BoneKey,
    time: f32,
    weights: &FxHashMap<u32, f32>,
) {
    walk(nodes, root, |node| node.apply_blended(time, weights));
}

/// Recomputes absolute transforms without touching poses. Used while
/// playback is stopped so the parent/child invariant holds after every
/// update call.
pub fn refresh_hierarchy(nodes: &mut SlotMap<BoneKey, Node>, root: BoneKey) {
    walk(nodes, root, |_| {});
}

fn walk(
    nodes: &mut SlotMap<BoneKey, Node>,
    root: BoneKey,
    mut apply: impl FnMut(&mut Node),
) {
    // Work stack: (node, parent's finalized absolute transform)
    let mut stack: Vec<(BoneKey, Mat4)> = Vec::with_capacity(64);
    stack.push((root, Mat4::IDENTITY));

    while let Some((key, parent_absolute)) = stack.pop() {
        let Some(node) = nodes.get_mut(key) else {
            continue;
        };

        apply(node);
        node.update_absolute(parent_absolute);

        let absolute = *node.absolute_transform();
        let child_count = node.children.len();

        // Push children in reverse so they pop in hierarchy order.
        for i in (0..child_count).rev() {
            if let Some(node) = nodes.get(key)
                && let Some(&child) = node.children.get(i)
            {
                stack.push((child, absolute));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn node(name: &str, translation: Vec3) -> Node {
        Node::new(name, Mat4::from_translation(translation), Mat4::IDENTITY)
    }

    #[test]
    fn chain_accumulates_parent_transforms() {
        let mut nodes: SlotMap<BoneKey, Node> = SlotMap::with_key();

        // Three-deep chain, each link translated +1 in X
        let mut keys = Vec::new();
        for i in 0..3 {
            let mut n = node(&format!("bone{i}"), Vec3::X);
            if let Some(&prev) = keys.last() {
                n.parent = Some(prev);
            }
            let key = nodes.insert(n);
            if let Some(&prev) = keys.last() {
                nodes.get_mut(prev).unwrap().children.push(key);
            }
            keys.push(key);
        }

        refresh_hierarchy(&mut nodes, keys[0]);

        for (i, &key) in keys.iter().enumerate() {
            let x = nodes.get(key).unwrap().absolute_position().x;
            let expected = (i + 1) as f32;
            assert!(
                (x - expected).abs() < 1e-5,
                "bone {i}: expected x={expected}, got x={x}"
            );
        }
    }

    #[test]
    fn deep_chain_no_stack_overflow() {
        let mut nodes: SlotMap<BoneKey, Node> = SlotMap::with_key();

        let depth = 2000;
        let mut prev: Option<BoneKey> = None;
        let mut first = None;
        for i in 0..depth {
            let mut n = node(&format!("bone{i}"), Vec3::X);
            n.parent = prev;
            let key = nodes.insert(n);
            if let Some(p) = prev {
                nodes.get_mut(p).unwrap().children.push(key);
            } else {
                first = Some(key);
            }
            prev = Some(key);
        }

        refresh_hierarchy(&mut nodes, first.unwrap());

        let last = nodes.get(prev.unwrap()).unwrap();
        assert!((last.absolute_position().x - depth as f32).abs() < 1e-2);
    }
}
