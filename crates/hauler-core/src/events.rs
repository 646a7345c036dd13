#![forbid(unsafe_code)]

//! Typed drag lifecycle events.
//!
//! [`DragEvent`] enumerates the fixed event set with fixed payload shapes;
//! there are no stringly-typed event names. Consumers implement [`EventSink`]
//! (closures qualify) and receive events synchronously as the engine
//! processes pointer input.
//!
//! # Causal order per session
//!
//! `Drag` → zero or more { `Cloned`, `Shadow`, paired `Over`/`Out` } →
//! exactly one of { `Drop`, `Cancel`, `Remove` } → `DragEnd`.
//!
//! A `Cloned` with [`CloneKind::Copy`] precedes `Drag`; a recorded hover
//! target always gets a final `Out` before `DragEnd`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::tree::NodeId;

/// What a clone was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloneKind {
    /// Copy semantics: the clone participates in the tree instead of the
    /// original.
    Copy,
    /// The floating proxy that follows the pointer.
    Mirror,
}

/// A drag lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DragEvent {
    /// A drag session started. `item` is the original node.
    Drag { item: NodeId, source: NodeId },
    /// A node was cloned, either for copy semantics or for the mirror.
    Cloned {
        clone: NodeId,
        original: NodeId,
        kind: CloneKind,
    },
    /// The in-transit node was relocated in the tree to preview the drop.
    Shadow {
        item: NodeId,
        container: NodeId,
        source: NodeId,
    },
    /// The pointer entered an accepting container.
    Over {
        item: NodeId,
        container: NodeId,
        source: NodeId,
    },
    /// The pointer left the container it was last over.
    Out {
        item: NodeId,
        container: NodeId,
        source: NodeId,
    },
    /// The session finalized with the item placed in `target` before
    /// `sibling`. `target` is `None` only when a detached copy was finalized
    /// without revert.
    Drop {
        item: NodeId,
        target: Option<NodeId>,
        source: NodeId,
        sibling: Option<NodeId>,
    },
    /// The session finalized with nothing moved (or reverted). `container`
    /// is the item's resting parent, if it has one.
    Cancel {
        item: NodeId,
        container: Option<NodeId>,
        source: NodeId,
    },
    /// The session finalized by detaching the item from the tree.
    Remove {
        item: NodeId,
        container: Option<NodeId>,
        source: NodeId,
    },
    /// The session is over and all state has been cleared. Always the last
    /// event of a session.
    DragEnd { item: NodeId },
}

impl DragEvent {
    /// Whether this event terminates a session (`Drop`, `Cancel`, `Remove`).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Drop { .. } | Self::Cancel { .. } | Self::Remove { .. }
        )
    }

    /// The container this event refers to, if any.
    #[must_use]
    pub fn container(&self) -> Option<NodeId> {
        match self {
            Self::Shadow { container, .. }
            | Self::Over { container, .. }
            | Self::Out { container, .. } => Some(*container),
            Self::Drop { target, .. } => *target,
            Self::Cancel { container, .. } | Self::Remove { container, .. } => *container,
            Self::Drag { source, .. } => Some(*source),
            Self::Cloned { .. } | Self::DragEnd { .. } => None,
        }
    }
}

/// Receives lifecycle events synchronously.
pub trait EventSink {
    fn emit(&mut self, event: DragEvent);
}

impl<F: FnMut(DragEvent)> EventSink for F {
    fn emit(&mut self, event: DragEvent) {
        self(event)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: DragEvent) {}
}

/// Shared single-threaded event buffer for tests and trace capture.
///
/// Clones share the same buffer, so one handle goes into the engine and the
/// other stays with the observer.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<DragEvent>>>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DragEvent> {
        self.events.borrow().clone()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for Recorder {
    fn emit(&mut self, event: DragEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::from_raw(raw)
    }

    #[test]
    fn terminal_classification() {
        assert!(
            DragEvent::Drop {
                item: id(1),
                target: Some(id(2)),
                source: id(3),
                sibling: None,
            }
            .is_terminal()
        );
        assert!(
            DragEvent::Cancel {
                item: id(1),
                container: None,
                source: id(3),
            }
            .is_terminal()
        );
        assert!(
            DragEvent::Remove {
                item: id(1),
                container: Some(id(2)),
                source: id(3),
            }
            .is_terminal()
        );
        assert!(
            !DragEvent::Drag {
                item: id(1),
                source: id(3),
            }
            .is_terminal()
        );
        assert!(!DragEvent::DragEnd { item: id(1) }.is_terminal());
    }

    #[test]
    fn container_extraction() {
        let over = DragEvent::Over {
            item: id(1),
            container: id(2),
            source: id(3),
        };
        assert_eq!(over.container(), Some(id(2)));
        assert_eq!(DragEvent::DragEnd { item: id(1) }.container(), None);
    }

    #[test]
    fn recorder_shares_buffer_across_clones() {
        let recorder = Recorder::new();
        let mut sink = recorder.clone();
        sink.emit(DragEvent::DragEnd { item: id(9) });
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.events(), vec![DragEvent::DragEnd { item: id(9) }]);

        recorder.clear();
        assert!(recorder.is_empty());
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: DragEvent| seen.push(event);
            sink.emit(DragEvent::DragEnd { item: id(4) });
        }
        assert_eq!(seen.len(), 1);
    }
}
