#![forbid(unsafe_code)]

//! Mirror lifecycle.
//!
//! The mirror is a clone of the dragged item that floats under the pointer
//! for the duration of an active drag. It exists iff the drag is tracking
//! pointer movement — a grabbed-but-unmoved item has no mirror, and neither
//! does a manually started session.
//!
//! Teardown is idempotent: the engine holds the tracker in an `Option` and
//! despawn consumes it.

use crate::geometry::Rect;
use crate::tree::{Marker, NodeId, TreeEnv};

/// The live mirror and what is needed to position and tear it down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MirrorTracker {
    /// The mirror node itself.
    pub node: NodeId,
    /// Where it was appended; unmarked unselectable on teardown.
    pub root: NodeId,
    /// The item's rendered box at spawn; relocated under the pointer on
    /// every move, never resized.
    pub frame: Rect,
}

/// Clone the item, size it to the item's rendered box, tag it as a mirror,
/// and append it to the mirror root. The root is marked unselectable until
/// despawn.
pub(crate) fn spawn<E: TreeEnv>(env: &mut E, item: NodeId, root: NodeId) -> MirrorTracker {
    let rect = env.bounding_box(item);
    let node = env.clone_node(item);
    env.set_marker(node, Marker::Transit, false);
    env.set_marker(node, Marker::Mirror, true);
    env.insert_before(root, node, None);
    env.set_frame(node, rect);
    env.set_marker(root, Marker::Unselectable, true);
    MirrorTracker {
        node,
        root,
        frame: rect,
    }
}

/// Detach and discard the mirror, restoring the mirror root.
pub(crate) fn despawn<E: TreeEnv>(env: &mut E, tracker: MirrorTracker) {
    env.set_marker(tracker.root, Marker::Unselectable, false);
    env.remove(tracker.node);
}

/// The mirror's frame for a pointer position: pointer minus grab offset,
/// shifted into absolute space by the scroll offset.
pub(crate) fn frame_at<E: TreeEnv>(
    env: &E,
    tracker: &MirrorTracker,
    pointer: crate::geometry::Point,
    grab_offset: crate::geometry::Point,
) -> Rect {
    let origin = pointer - grab_offset + env.scroll_offset();
    tracker.frame.at(origin)
}
