#![forbid(unsafe_code)]

//! Node identity and the environment adapter.
//!
//! The engine never owns the visual tree. Everything it needs from the host —
//! hit testing, bounding boxes, parent lookup, structural mutation — goes
//! through [`TreeEnv`]. The engine identifies nodes purely by [`NodeId`];
//! what a node *is* (a DOM element, a widget, a test fixture) is the host's
//! business.
//!
//! # Invariants expected of implementations
//!
//! 1. `hit_test` never returns the `hidden` node or any of its descendants.
//! 2. `clone_node` returns a detached node (no parent) with the same subtree
//!    shape and rendered size as the original.
//! 3. `insert_before(c, n, Some(r))` requires `r` to be a direct child of `c`;
//!    `None` appends at the end.
//! 4. `remove` on an already-detached node is a no-op.

use crate::geometry::{Point, Rect};

/// Opaque identifier for a node in the host's visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw id. Host environments mint these.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transient visual tags the engine toggles on nodes during a drag.
///
/// The engine never styles anything itself; it only flips markers and the
/// host maps them to whatever visual treatment it wants (CSS classes,
/// attributes, render flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The node currently being dragged (or its copy) while in the tree.
    Transit,
    /// The floating proxy that follows the pointer.
    Mirror,
    /// Set on the mirror root for the duration of a drag to suppress
    /// incidental text selection.
    Unselectable,
    /// Spill feedback: the in-transit node is outside every accepting
    /// container and `remove_on_spill` is on.
    Hidden,
}

/// Capabilities the engine consumes from its host environment.
///
/// Query methods take `&self`; structural mutation takes `&mut self`. All
/// calls are synchronous and complete before the engine continues — there is
/// exactly one logical writer (the active session) at a time.
pub trait TreeEnv {
    /// Topmost node at `point`, excluding `hidden` and its entire subtree.
    ///
    /// The mirror is passed as `hidden` during a drag so that it can never be
    /// its own hit result.
    fn hit_test(&self, point: Point, hidden: Option<NodeId>) -> Option<NodeId>;

    /// Rendered bounding box of a node.
    fn bounding_box(&self, node: NodeId) -> Rect;

    /// Parent of a node, or `None` for the root and detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children of a node in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// The root of the tree. Default mirror root when none is configured.
    fn root(&self) -> NodeId;

    /// The sibling immediately after `node`, or `None` if it is the last
    /// child or detached.
    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&s| s == node)?;
        siblings.get(index + 1).copied()
    }

    /// Deep-clone a node. The clone is detached.
    fn clone_node(&mut self, node: NodeId) -> NodeId;

    /// Insert `node` into `container` before `reference`, detaching it from
    /// its current parent first. `None` appends at the end.
    fn insert_before(&mut self, container: NodeId, node: NodeId, reference: Option<NodeId>);

    /// Detach a node from its parent. No-op if already detached.
    fn remove(&mut self, node: NodeId);

    /// Current scroll offset, for converting pointer coordinates to the
    /// absolute space the mirror is positioned in.
    fn scroll_offset(&self) -> Point {
        Point::ZERO
    }

    /// Position and size a node in absolute coordinates. Only ever called
    /// for the mirror.
    fn set_frame(&mut self, node: NodeId, frame: Rect) {
        let _ = (node, frame);
    }

    /// Toggle a transient marker on a node.
    fn set_marker(&mut self, node: NodeId, marker: Marker, on: bool) {
        let _ = (node, marker, on);
    }

    /// Whether the node is a text-input-like element. Used to avoid
    /// hijacking text selection when `ignore_input_text_selection` is on.
    fn is_text_input(&self, node: NodeId) -> bool {
        let _ = node;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::NodeId;

    #[test]
    fn node_id_round_trip() {
        let id = NodeId::from_raw(42);
        assert_eq!(id.to_raw(), 42);
        assert_eq!(format!("{id}"), "#42");
    }

    #[test]
    fn node_id_hash_consistency() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(NodeId::from_raw(7));
        set.insert(NodeId::from_raw(7));
        assert_eq!(set.len(), 1);
    }
}
