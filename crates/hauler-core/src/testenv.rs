#![forbid(unsafe_code)]

//! In-memory tree environment for tests, benches, and the scenario harness.
//!
//! [`TestTree`] is a deterministic [`TreeEnv`]: an arena of nodes with
//! explicit frames, topmost-last hit testing (later siblings paint on top),
//! and a minimal auto-layout — containers created with an axis restack their
//! children after every structural mutation, which is what makes live
//! reordering observable mid-drag.
//!
//! This is a fixture, not a layout engine: nodes nested *inside* items keep
//! their explicit frames and do not follow the item when it is restacked.
//! Hit tests against such handles are only meaningful at press time.

use ahash::AHashMap;

use crate::geometry::{Point, Rect};
use crate::options::Axis;
use crate::tree::{Marker, NodeId, TreeEnv};

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    frame: Rect,
    /// Main-axis size used when a layout container stacks this node.
    extent: f32,
    layout: Option<Axis>,
    text_input: bool,
    markers: Vec<Marker>,
}

impl Node {
    fn new(parent: Option<NodeId>, frame: Rect) -> Self {
        Self {
            parent,
            children: Vec::new(),
            frame,
            extent: frame.height,
            layout: None,
            text_input: false,
            markers: Vec::new(),
        }
    }
}

/// Deterministic in-memory visual tree.
#[derive(Debug, Clone)]
pub struct TestTree {
    nodes: AHashMap<NodeId, Node>,
    root: NodeId,
    next: u64,
    scroll: Point,
}

impl TestTree {
    /// Create a tree with a root node covering `root_frame`.
    #[must_use]
    pub fn new(root_frame: Rect) -> Self {
        let root = NodeId::from_raw(0);
        let mut nodes = AHashMap::new();
        nodes.insert(root, Node::new(None, root_frame));
        Self {
            nodes,
            root,
            next: 1,
            scroll: Point::ZERO,
        }
    }

    fn mint(&mut self) -> NodeId {
        let id = NodeId::from_raw(self.next);
        self.next += 1;
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(&id).expect("unknown node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).expect("unknown node id")
    }

    /// Add a plain node with an explicit frame.
    pub fn add_node(&mut self, parent: NodeId, frame: Rect) -> NodeId {
        let id = self.mint();
        self.nodes.insert(id, Node::new(Some(parent), frame));
        self.node_mut(parent).children.push(id);
        self.reflow();
        id
    }

    /// Add a container that stacks its children along `axis`.
    pub fn add_container(&mut self, parent: NodeId, frame: Rect, axis: Axis) -> NodeId {
        let id = self.add_node(parent, frame);
        self.node_mut(id).layout = Some(axis);
        id
    }

    /// Add an item to a layout container; its frame is computed by the
    /// container from `extent` (main-axis size).
    pub fn add_item(&mut self, container: NodeId, extent: f32) -> NodeId {
        let id = self.mint();
        let mut node = Node::new(Some(container), Rect::default());
        node.extent = extent;
        self.nodes.insert(id, node);
        self.node_mut(container).children.push(id);
        self.reflow();
        id
    }

    /// Mark a node as a text-input-like element.
    pub fn set_text_input(&mut self, node: NodeId, input: bool) {
        self.node_mut(node).text_input = input;
    }

    /// Set the scroll offset reported to the engine.
    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Whether a marker is currently set on a node.
    #[must_use]
    pub fn has_marker(&self, node: NodeId, marker: Marker) -> bool {
        self.node(node).markers.contains(&marker)
    }

    /// Whether a node is detached from the tree.
    #[must_use]
    pub fn detached(&self, node: NodeId) -> bool {
        node != self.root && self.node(node).parent.is_none()
    }

    /// The node's current frame.
    #[must_use]
    pub fn frame(&self, node: NodeId) -> Rect {
        self.node(node).frame
    }

    /// Restack every layout container's children, top-down.
    fn reflow(&mut self) {
        self.reflow_from(self.root);
    }

    fn reflow_from(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        if let Some(axis) = self.node(id).layout {
            let frame = self.node(id).frame;
            let mut cursor = match axis {
                Axis::Vertical => frame.y,
                Axis::Horizontal => frame.x,
            };
            for &child in &children {
                let extent = self.node(child).extent;
                let child_frame = match axis {
                    Axis::Vertical => Rect::new(frame.x, cursor, frame.width, extent),
                    Axis::Horizontal => Rect::new(cursor, frame.y, extent, frame.height),
                };
                self.node_mut(child).frame = child_frame;
                cursor += extent;
            }
        }
        for child in children {
            self.reflow_from(child);
        }
    }

    fn hit(&self, id: NodeId, point: Point, hidden: Option<NodeId>) -> Option<NodeId> {
        if Some(id) == hidden {
            return None;
        }
        let node = self.node(id);
        if !node.frame.contains(point) {
            return None;
        }
        // Later siblings paint on top.
        for &child in node.children.iter().rev() {
            if let Some(found) = self.hit(child, point, hidden) {
                return Some(found);
            }
        }
        Some(id)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&c| c != node);
            self.node_mut(node).parent = None;
        }
    }

    fn clone_subtree(&mut self, node: NodeId, parent: Option<NodeId>) -> NodeId {
        let id = self.mint();
        let mut copy = self.node(node).clone();
        let children = std::mem::take(&mut copy.children);
        copy.parent = parent;
        self.nodes.insert(id, copy);
        for child in children {
            let child_copy = self.clone_subtree(child, Some(id));
            self.node_mut(id).children.push(child_copy);
        }
        id
    }
}

impl TreeEnv for TestTree {
    fn hit_test(&self, point: Point, hidden: Option<NodeId>) -> Option<NodeId> {
        self.hit(self.root, point, hidden)
    }

    fn bounding_box(&self, node: NodeId) -> Rect {
        self.node(node).frame
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children.clone()
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn clone_node(&mut self, node: NodeId) -> NodeId {
        self.clone_subtree(node, None)
    }

    fn insert_before(&mut self, container: NodeId, node: NodeId, reference: Option<NodeId>) {
        self.detach(node);
        let index = match reference {
            Some(r) => self
                .node(container)
                .children
                .iter()
                .position(|&c| c == r)
                .expect("reference must be a direct child of container"),
            None => self.node(container).children.len(),
        };
        self.node_mut(container).children.insert(index, node);
        self.node_mut(node).parent = Some(container);
        self.reflow();
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
        self.reflow();
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn set_frame(&mut self, node: NodeId, frame: Rect) {
        self.node_mut(node).frame = frame;
    }

    fn set_marker(&mut self, node: NodeId, marker: Marker, on: bool) {
        let markers = &mut self.node_mut(node).markers;
        if on {
            if !markers.contains(&marker) {
                markers.push(marker);
            }
        } else {
            markers.retain(|&m| m != marker);
        }
    }

    fn is_text_input(&self, node: NodeId) -> bool {
        self.node(node).text_input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (TestTree, NodeId, [NodeId; 2]) {
        let mut tree = TestTree::new(Rect::new(0.0, 0.0, 200.0, 200.0));
        let root = tree.root();
        let container = tree.add_container(root, Rect::new(0.0, 0.0, 100.0, 100.0), Axis::Vertical);
        let a = tree.add_item(container, 20.0);
        let b = tree.add_item(container, 20.0);
        (tree, container, [a, b])
    }

    #[test]
    fn layout_stacks_children() {
        let (tree, _, [a, b]) = fixture();
        assert_eq!(tree.frame(a), Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(tree.frame(b), Rect::new(0.0, 20.0, 100.0, 20.0));
    }

    #[test]
    fn hit_test_finds_deepest_node() {
        let (tree, container, [a, b]) = fixture();
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0), None), Some(a));
        assert_eq!(tree.hit_test(Point::new(5.0, 25.0), None), Some(b));
        assert_eq!(tree.hit_test(Point::new(5.0, 70.0), None), Some(container));
        assert_eq!(tree.hit_test(Point::new(500.0, 500.0), None), None);
    }

    #[test]
    fn hit_test_skips_hidden_subtree() {
        let (tree, container, [a, _]) = fixture();
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0), Some(a)), Some(container));
    }

    #[test]
    fn insert_before_moves_and_restacks() {
        let (mut tree, container, [a, b]) = fixture();
        tree.insert_before(container, b, Some(a));
        assert_eq!(tree.children(container), vec![b, a]);
        assert_eq!(tree.frame(b), Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(tree.frame(a), Rect::new(0.0, 20.0, 100.0, 20.0));
    }

    #[test]
    fn insert_before_none_appends() {
        let (mut tree, container, [a, b]) = fixture();
        tree.insert_before(container, a, None);
        assert_eq!(tree.children(container), vec![b, a]);
    }

    #[test]
    fn remove_detaches_and_restacks() {
        let (mut tree, container, [a, b]) = fixture();
        tree.remove(a);
        assert!(tree.detached(a));
        assert_eq!(tree.children(container), vec![b]);
        assert_eq!(tree.frame(b), Rect::new(0.0, 0.0, 100.0, 20.0));
        // Removing again is a no-op.
        tree.remove(a);
        assert!(tree.detached(a));
    }

    #[test]
    fn next_sibling_follows_order() {
        let (tree, _, [a, b]) = fixture();
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.next_sibling(b), None);
    }

    #[test]
    fn clone_node_is_deep_and_detached() {
        let (mut tree, _, [a, _]) = fixture();
        let handle = tree.add_node(a, Rect::new(2.0, 2.0, 5.0, 5.0));
        let clone = tree.clone_node(a);
        assert!(tree.detached(clone));
        assert_eq!(tree.children(clone).len(), 1);
        let cloned_handle = tree.children(clone)[0];
        assert_ne!(cloned_handle, handle);
        assert_eq!(tree.parent(cloned_handle), Some(clone));
    }

    #[test]
    fn markers_toggle() {
        let (mut tree, _, [a, _]) = fixture();
        assert!(!tree.has_marker(a, Marker::Transit));
        tree.set_marker(a, Marker::Transit, true);
        tree.set_marker(a, Marker::Transit, true);
        assert!(tree.has_marker(a, Marker::Transit));
        tree.set_marker(a, Marker::Transit, false);
        assert!(!tree.has_marker(a, Marker::Transit));
    }
}
