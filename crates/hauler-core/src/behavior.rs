#![forbid(unsafe_code)]

//! User-supplied drag policy.
//!
//! [`DragBehavior`] is a fixed capability interface with one method per
//! decision point. Every method has a permissive default matching the
//! engine's out-of-the-box behavior, so implementors only override what they
//! care about. The engine re-invokes predicates at every decision point and
//! never caches results across calls.
//!
//! Predicates are assumed total and side-effect-free; a panicking predicate
//! is a caller defect and propagates uncaught.

use crate::tree::NodeId;

/// Decision callbacks consulted by the engine.
///
/// `item` is always the original node, never its copy. `handle` is the node
/// the pointer actually went down on, which may be a descendant of `item`.
pub trait DragBehavior {
    /// May `item` be picked up out of `source`? `sibling` is the node
    /// currently following `item`, if any.
    fn moves(
        &self,
        item: NodeId,
        source: NodeId,
        handle: NodeId,
        sibling: Option<NodeId>,
    ) -> bool {
        let _ = (item, source, handle, sibling);
        true
    }

    /// May `item` be dropped into `target` before `reference`?
    ///
    /// Not consulted for the item's own initial position — a no-op drop is
    /// always legal.
    fn accepts(
        &self,
        item: NodeId,
        target: NodeId,
        source: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        let _ = (item, target, source, reference);
        true
    }

    /// Does grabbing `item` via `handle` fail to qualify as a drag start?
    /// Lets hosts veto drags from specific sub-elements (e.g. buttons inside
    /// a draggable card) without vetoing the item itself.
    fn invalid(&self, item: NodeId, handle: NodeId) -> bool {
        let _ = (item, handle);
        false
    }

    /// Is `node` a container, beyond those explicitly registered with the
    /// engine?
    fn is_container(&self, node: NodeId) -> bool {
        let _ = node;
        false
    }

    /// Should dragging `item` out of `source` leave the original in place
    /// and move a clone instead?
    fn copy(&self, item: NodeId, source: NodeId) -> bool {
        let _ = (item, source);
        false
    }
}

/// All defaults: everything moves, everything accepts, nothing copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl DragBehavior for Permissive {}

/// [`Permissive`] with copy semantics always on. The constant-returning
/// normalization of the literal `copy: true` configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysCopy;

impl DragBehavior for AlwaysCopy {
    fn copy(&self, _item: NodeId, _source: NodeId) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_defaults() {
        let b = Permissive;
        let n = NodeId::from_raw(1);
        assert!(b.moves(n, n, n, None));
        assert!(b.accepts(n, n, n, None));
        assert!(!b.invalid(n, n));
        assert!(!b.is_container(n));
        assert!(!b.copy(n, n));
    }

    #[test]
    fn always_copy_only_changes_copy() {
        let b = AlwaysCopy;
        let n = NodeId::from_raw(1);
        assert!(b.copy(n, n));
        assert!(b.moves(n, n, n, None));
        assert!(!b.invalid(n, n));
    }
}
