#![forbid(unsafe_code)]

//! Drag-and-drop reordering engine over an abstract visual tree.
//!
//! `hauler-core` turns raw pointer input into drag-and-drop semantics:
//! grabbing items out of registered containers, previewing the drop by
//! relocating the item live while the pointer moves, and finalizing as a
//! drop, cancel, or removal. It owns no widgets and draws nothing — the host
//! supplies the tree through the [`TreeEnv`] adapter and maps the engine's
//! structural mutations and [`Marker`]s to its own rendering.
//!
//! # Architecture
//!
//! - [`DragEngine`] is the gesture state machine
//!   (`Idle → Grabbed → Dragging → terminal`). Feed it
//!   [`PointerEvent`]s; it resolves drop targets on every move.
//! - [`TreeEnv`] is the host adapter: hit testing, bounding boxes, and
//!   structural mutation, all keyed by opaque [`NodeId`]s.
//! - [`DragBehavior`] carries the host's policy predicates (what moves, what
//!   accepts, what copies); [`Options`] carries the plain knobs.
//! - [`DragEvent`]s stream through an [`EventSink`] in a fixed causal order
//!   per session, ending with exactly one terminal event and a `DragEnd`.
//!
//! # Example
//!
//! The environment below is a stub; a real host adapts its widget tree or
//! document. The point is the wiring: one engine per drag context,
//! containers registered by id, pointer events forwarded as they arrive.
//!
//! ```
//! use hauler_core::{
//!     DragEngine, DragEvent, NodeId, Options, Permissive, Point, PointerEvent, Rect, TreeEnv,
//! };
//!
//! struct Host;
//!
//! impl TreeEnv for Host {
//!     fn hit_test(&self, _point: Point, _hidden: Option<NodeId>) -> Option<NodeId> {
//!         None
//!     }
//!     fn bounding_box(&self, _node: NodeId) -> Rect {
//!         Rect::default()
//!     }
//!     fn parent(&self, _node: NodeId) -> Option<NodeId> {
//!         None
//!     }
//!     fn children(&self, _node: NodeId) -> Vec<NodeId> {
//!         Vec::new()
//!     }
//!     fn root(&self) -> NodeId {
//!         NodeId::from_raw(0)
//!     }
//!     fn clone_node(&mut self, node: NodeId) -> NodeId {
//!         node
//!     }
//!     fn insert_before(&mut self, _c: NodeId, _n: NodeId, _r: Option<NodeId>) {}
//!     fn remove(&mut self, _node: NodeId) {}
//! }
//!
//! let list = NodeId::from_raw(1);
//! let mut engine = DragEngine::new(Host, Permissive)
//!     .with_options(Options::default())
//!     .with_sink(|event: DragEvent| println!("{event:?}"));
//! engine.add_container(list);
//!
//! engine.on_pointer_down(PointerEvent::new(Point::new(4.0, 4.0)));
//! engine.on_pointer_up(PointerEvent::released(Point::new(4.0, 4.0)));
//! ```
//!
//! # Feature flags
//!
//! - `tracing`: structured logging of state transitions via `tracing`.
//! - `serde`: serde derives on [`NodeId`], [`DragEvent`], and config enums.
//! - `test-helpers`: the in-memory `testenv::TestTree` environment, for
//!   tests and benches outside this crate.

pub mod behavior;
pub mod events;
pub mod geometry;
pub mod options;
pub mod pointer;
pub mod resolver;
pub mod tree;

mod engine;
mod logging;
mod mirror;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testenv;

pub use behavior::{AlwaysCopy, DragBehavior, Permissive};
pub use engine::DragEngine;
pub use events::{CloneKind, DragEvent, EventSink, NullSink, Recorder};
pub use geometry::{Point, Rect};
pub use options::{Axis, Options};
pub use pointer::{Modifiers, PointerButtons, PointerEvent};
pub use tree::{Marker, NodeId, TreeEnv};
