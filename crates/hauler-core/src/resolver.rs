#![forbid(unsafe_code)]

//! Insertion-point computation.
//!
//! Two pure helpers used by the engine's drop-target resolution:
//!
//! - [`immediate_child`] finds the direct child of a container on the path
//!   to a hit node.
//! - [`reference_point`] turns that child (or the bare container) plus the
//!   pointer position into the sibling the dragged item would be inserted
//!   before. `None` means "append at end".
//!
//! Acceptance (which container wins, and whether its predicates agree) lives
//! on the engine, because it needs session state.

use crate::geometry::Point;
use crate::options::Axis;
use crate::tree::{NodeId, TreeEnv};

/// The direct child of `container` whose subtree contains `descendant`.
///
/// Returns `Some(container)` when `descendant` *is* the container (pointer
/// over empty container space), and `None` when the climb escapes the tree
/// without passing through `container`.
#[must_use]
pub fn immediate_child<E: TreeEnv>(
    env: &E,
    container: NodeId,
    descendant: NodeId,
) -> Option<NodeId> {
    let mut node = descendant;
    loop {
        if node == container {
            return Some(node);
        }
        match env.parent(node) {
            Some(parent) if parent == container => return Some(node),
            Some(parent) => node = parent,
            None => return None,
        }
    }
}

/// The sibling the dragged item would be inserted before, given the pointer
/// position and the immediate child under it.
///
/// When the pointer is over a child, the child's midpoint along `axis`
/// decides before/after. When it is over the container itself, the children
/// are scanned in document order for the first whose midpoint is past the
/// pointer.
#[must_use]
pub fn reference_point<E: TreeEnv>(
    env: &E,
    axis: Axis,
    container: NodeId,
    immediate: NodeId,
    point: Point,
) -> Option<NodeId> {
    if immediate != container {
        let rect = env.bounding_box(immediate);
        let after = match axis {
            Axis::Horizontal => point.x > rect.center_x(),
            Axis::Vertical => point.y > rect.center_y(),
        };
        if after {
            env.next_sibling(immediate)
        } else {
            Some(immediate)
        }
    } else {
        // Pointer over empty container space: linear scan, any position.
        for child in env.children(container) {
            let rect = env.bounding_box(child);
            let past = match axis {
                Axis::Horizontal => rect.center_x() > point.x,
                Axis::Vertical => rect.center_y() > point.y,
            };
            if past {
                return Some(child);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::testenv::TestTree;

    /// Root 100x300 with one vertical container holding three 20-tall items.
    fn stack() -> (TestTree, NodeId, [NodeId; 3]) {
        let mut tree = TestTree::new(Rect::new(0.0, 0.0, 100.0, 300.0));
        let root = tree.root();
        let container = tree.add_container(root, Rect::new(0.0, 0.0, 100.0, 100.0), Axis::Vertical);
        let a = tree.add_item(container, 20.0);
        let b = tree.add_item(container, 20.0);
        let c = tree.add_item(container, 20.0);
        (tree, container, [a, b, c])
    }

    #[test]
    fn immediate_child_of_direct_child() {
        let (tree, container, [a, ..]) = stack();
        assert_eq!(immediate_child(&tree, container, a), Some(a));
    }

    #[test]
    fn immediate_child_climbs_nested_markup() {
        let (mut tree, container, [a, ..]) = stack();
        let handle = tree.add_node(a, Rect::new(2.0, 2.0, 10.0, 10.0));
        assert_eq!(immediate_child(&tree, container, handle), Some(a));
    }

    #[test]
    fn immediate_child_of_container_itself() {
        let (tree, container, _) = stack();
        assert_eq!(immediate_child(&tree, container, container), Some(container));
    }

    #[test]
    fn immediate_child_misses_unrelated_node() {
        let (mut tree, container, _) = stack();
        let root = tree.root();
        let other = tree.add_node(root, Rect::new(0.0, 200.0, 50.0, 50.0));
        assert_eq!(immediate_child(&tree, container, other), None);
    }

    #[test]
    fn reference_before_midpoint_is_child_itself() {
        let (tree, container, [a, ..]) = stack();
        // a spans y 0..20, midpoint 10
        let r = reference_point(&tree, Axis::Vertical, container, a, Point::new(5.0, 4.0));
        assert_eq!(r, Some(a));
    }

    #[test]
    fn reference_past_midpoint_is_next_sibling() {
        let (tree, container, [a, b, _]) = stack();
        let r = reference_point(&tree, Axis::Vertical, container, a, Point::new(5.0, 16.0));
        assert_eq!(r, Some(b));
    }

    #[test]
    fn reference_past_midpoint_of_last_child_is_none() {
        let (tree, container, [.., c]) = stack();
        // c spans y 40..60, midpoint 50
        let r = reference_point(&tree, Axis::Vertical, container, c, Point::new(5.0, 55.0));
        assert_eq!(r, None);
    }

    #[test]
    fn empty_space_scan_picks_first_child_past_pointer() {
        let (tree, container, [_, b, _]) = stack();
        // Pointer at y 25: a's midpoint (10) is behind, b's (30) is past.
        let r = reference_point(
            &tree,
            Axis::Vertical,
            container,
            container,
            Point::new(5.0, 25.0),
        );
        assert_eq!(r, Some(b));
    }

    #[test]
    fn empty_space_below_everything_appends() {
        let (tree, container, _) = stack();
        let r = reference_point(
            &tree,
            Axis::Vertical,
            container,
            container,
            Point::new(5.0, 90.0),
        );
        assert_eq!(r, None);
    }

    #[test]
    fn empty_container_always_appends() {
        let mut tree = TestTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = tree.root();
        let container = tree.add_container(root, Rect::new(0.0, 0.0, 100.0, 50.0), Axis::Vertical);
        let r = reference_point(
            &tree,
            Axis::Vertical,
            container,
            container,
            Point::new(10.0, 10.0),
        );
        assert_eq!(r, None);
    }

    #[test]
    fn horizontal_axis_compares_x_centers() {
        let mut tree = TestTree::new(Rect::new(0.0, 0.0, 300.0, 100.0));
        let root = tree.root();
        let row = tree.add_container(root, Rect::new(0.0, 0.0, 300.0, 40.0), Axis::Horizontal);
        let a = tree.add_item(row, 30.0);
        let b = tree.add_item(row, 30.0);
        // a spans x 0..30, midpoint 15
        assert_eq!(
            reference_point(&tree, Axis::Horizontal, row, a, Point::new(10.0, 5.0)),
            Some(a)
        );
        assert_eq!(
            reference_point(&tree, Axis::Horizontal, row, a, Point::new(20.0, 5.0)),
            Some(b)
        );
        assert_eq!(
            reference_point(&tree, Axis::Horizontal, row, row, Point::new(200.0, 5.0)),
            None
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The empty-space scan returns the first child in document
            /// order whose midpoint lies past the pointer.
            #[test]
            fn scan_returns_first_past_midpoint(
                extents in proptest::collection::vec(1.0f32..40.0, 1..12),
                y in 0.0f32..500.0,
            ) {
                let mut tree = TestTree::new(Rect::new(0.0, 0.0, 100.0, 600.0));
                let root = tree.root();
                let container =
                    tree.add_container(root, Rect::new(0.0, 0.0, 100.0, 500.0), Axis::Vertical);
                let children: Vec<_> =
                    extents.iter().map(|&e| tree.add_item(container, e)).collect();

                let got = reference_point(
                    &tree,
                    Axis::Vertical,
                    container,
                    container,
                    Point::new(5.0, y),
                );
                let expected = children
                    .iter()
                    .copied()
                    .find(|&c| tree.bounding_box(c).center_y() > y);
                prop_assert_eq!(got, expected);
            }
        }
    }
}
