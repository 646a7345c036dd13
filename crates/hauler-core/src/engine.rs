#![forbid(unsafe_code)]

//! The drag gesture state machine.
//!
//! [`DragEngine`] owns the drag lifecycle: grab detection on pointer-down,
//! move-threshold gating, mirror tracking, continuous drop-target resolution
//! on every pointer-move, and the terminal paths on pointer-up or explicit
//! calls.
//!
//! # State Machine
//!
//! `Idle → Grabbed → Dragging → {Dropped, Cancelled, Removed} → Idle`
//!
//! - **Idle → Grabbed**: pointer-down over a movable item with the primary
//!   button and no Ctrl/Meta held.
//! - **Grabbed → Dragging**: first pointer-move past the per-axis slide
//!   tolerance (and not over a text input, when configured). The session
//!   starts, the mirror spawns, and one resolution pass runs immediately.
//! - **Grabbed → Idle**: the primary button is no longer held at the first
//!   move (a release that never fired), or pointer-up before the threshold.
//! - **Dragging → terminal**: pointer-up resolves drop / cancel / remove /
//!   spill; `end`, `cancel`, and `remove` finalize explicitly.
//!
//! # Invariants
//!
//! 1. At most one session exists at a time; a pointer-down while a mirror
//!    exists is ignored.
//! 2. `last_drop_target` only changes through balanced `Out`/`Over` pairs.
//! 3. Exactly one of `Drop`/`Cancel`/`Remove` fires per completed session,
//!    immediately followed by `DragEnd`, after which all session state is
//!    cleared and redundant finalizer calls are silent no-ops.
//! 4. Dropping an item at exactly its original position emits `Cancel`, not
//!    `Drop`.
//!
//! # Failure Modes
//!
//! - Predicates are caller-supplied and assumed total; a panicking predicate
//!   propagates uncaught.
//! - A host that never delivers pointer-up leaves the session active; the
//!   host must synthesize a release (`on_pointer_up` or `end`).

use ahash::AHashSet;

use crate::behavior::DragBehavior;
use crate::events::{CloneKind, DragEvent, EventSink, NullSink};
use crate::geometry::Point;
use crate::logging::{debug, trace};
use crate::mirror::{self, MirrorTracker};
use crate::options::Options;
use crate::pointer::PointerEvent;
use crate::resolver;
use crate::tree::{Marker, NodeId, TreeEnv};

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// Candidacy result held between pointer-down and the promoting move.
#[derive(Debug, Clone, Copy)]
struct Grab {
    item: NodeId,
    source: NodeId,
    press: Point,
}

/// One active drag. Created at promotion (or manual start), destroyed at
/// cleanup.
#[derive(Debug, Clone, Copy)]
struct Session {
    /// The node being moved. Stays in place for copy sessions.
    item: NodeId,
    /// Container the item was grabbed out of.
    source: NodeId,
    /// Sibling following `item` when grabbed; detects no-op drops.
    initial_sibling: Option<NodeId>,
    /// Sibling the item would currently be inserted before.
    current_sibling: Option<NodeId>,
    /// Clone standing in for `item` when copy semantics are active.
    copy: Option<NodeId>,
    /// Last container recognized as the hover target; drives `Over`/`Out`.
    last_drop_target: Option<NodeId>,
    /// Pointer offset from the item's top-left corner at promotion.
    grab_offset: Point,
}

// ---------------------------------------------------------------------------
// DragEngine
// ---------------------------------------------------------------------------

/// Drag-and-drop engine over a host-provided tree environment.
///
/// Feed it native pointer events; observe typed [`DragEvent`]s through the
/// configured sink. All processing is synchronous — every call completes its
/// full resolve-and-mutate pass before returning.
pub struct DragEngine<E: TreeEnv, B: DragBehavior> {
    env: E,
    behavior: B,
    options: Options,
    containers: AHashSet<NodeId>,
    sink: Box<dyn EventSink>,
    attached: bool,
    grabbed: Option<Grab>,
    session: Option<Session>,
    mirror: Option<MirrorTracker>,
}

impl<E: TreeEnv, B: DragBehavior> std::fmt::Debug for DragEngine<E, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragEngine")
            .field("attached", &self.attached)
            .field("grabbed", &self.grabbed.is_some())
            .field("dragging", &self.dragging())
            .field("containers", &self.containers.len())
            .finish()
    }
}

impl<E: TreeEnv, B: DragBehavior> DragEngine<E, B> {
    /// Create an engine over `env` with default options and no sink.
    ///
    /// The engine starts attached, mirroring listener binding at
    /// construction time.
    #[must_use]
    pub fn new(env: E, behavior: B) -> Self {
        Self {
            env,
            behavior,
            options: Options::default(),
            containers: AHashSet::new(),
            sink: Box::new(NullSink),
            attached: true,
            grabbed: None,
            session: None,
            mirror: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_sink<S: EventSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Register a container. Its direct children become drag candidates and
    /// it becomes a valid drop target.
    pub fn add_container(&mut self, container: NodeId) {
        self.containers.insert(container);
    }

    /// Unregister a container.
    pub fn remove_container(&mut self, container: NodeId) {
        self.containers.remove(&container);
    }

    /// Registered containers, in no particular order.
    pub fn containers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.containers.iter().copied()
    }

    /// Current configuration.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The host environment.
    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Mutable access to the host environment.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Whether a drag session is active.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Resume reacting to pointer events.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop reacting to pointer events. Does not finalize an active session;
    /// use [`destroy`](Self::destroy) for that.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Whether the engine reacts to pointer events.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Detach and finalize any in-flight session as a cancel.
    pub fn destroy(&mut self) {
        self.detach();
        self.ungrab();
        self.cancel();
    }

    // -- pointer input ------------------------------------------------------

    /// Native pointer-down. Runs the candidacy check and records a grab.
    pub fn on_pointer_down(&mut self, event: PointerEvent) {
        if !self.attached || !event.is_primary() {
            return;
        }
        let Some(node) = self.env.hit_test(event.pos, None) else {
            return;
        };
        let Some(grab) = self.can_start(node) else {
            return;
        };
        debug!(item = %grab.0, source = %grab.1, "grabbed");
        self.grabbed = Some(Grab {
            item: grab.0,
            source: grab.1,
            press: event.pos,
        });
    }

    /// Native pointer-move. Promotes a grab past the slide tolerance, or
    /// re-resolves the drop target for an active drag.
    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        if !self.attached {
            return;
        }
        if let Some(grab) = self.grabbed {
            // A pending grab outranks a mirrorless manual session; promotion
            // finishes the stale session before starting the new drag.
            if event.buttons.is_empty() {
                // The release never fired (text-selection edge); abort.
                self.ungrab();
                return;
            }
            let dx = (event.pos.x - grab.press.x).abs();
            let dy = (event.pos.y - grab.press.y).abs();
            if dx <= self.options.slide_factor_x && dy <= self.options.slide_factor_y {
                return;
            }
            if self.options.ignore_input_text_selection
                && let Some(under) = self.env.hit_test(event.pos, None)
                && self.env.is_text_input(under)
            {
                return;
            }
            self.grabbed = None;
            self.promote(grab, event.pos);
        } else if self.mirror.is_some() {
            self.drag_move(event.pos);
        }
    }

    /// Native pointer-up. Finalizes an active session against the resolved
    /// drop target, or just clears a pending grab.
    pub fn on_pointer_up(&mut self, event: PointerEvent) {
        if !self.attached {
            return;
        }
        self.release(event.pos);
    }

    // -- public operations --------------------------------------------------

    /// Whether a drag could start from `node` right now.
    #[must_use]
    pub fn can_move(&self, node: NodeId) -> bool {
        self.can_start(node).is_some()
    }

    /// Manually start a session from `node`, bypassing the pointer
    /// threshold. No mirror is created; the session tracks no pointer.
    pub fn start(&mut self, node: NodeId) {
        if let Some((item, source)) = self.can_start(node) {
            self.begin(item, source);
        }
    }

    /// Finalize the session as a drop against the item's current parent.
    /// No-op when no session is active.
    pub fn end(&mut self) {
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let item = s.copy.unwrap_or(s.item);
        let parent = self.env.parent(item);
        self.finish_drop(item, parent);
    }

    /// Finalize the session, reverting per the `revert_on_spill` option.
    /// No-op when no session is active.
    pub fn cancel(&mut self) {
        self.cancel_impl(None);
    }

    /// Finalize the session, overriding the revert option for this call.
    pub fn cancel_with(&mut self, revert: bool) {
        self.cancel_impl(Some(revert));
    }

    /// Finalize the session by detaching the item from its parent. For a
    /// copy session this discards the clone and emits `Cancel` — nothing was
    /// ever removed from the source. No-op when no session is active.
    pub fn remove(&mut self) {
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (source, copy) = (s.source, s.copy);
        let item = copy.unwrap_or(s.item);
        let parent = self.env.parent(item);
        if parent.is_some() {
            self.env.remove(item);
        }
        let event = if copy.is_some() {
            DragEvent::Cancel {
                item,
                container: parent,
                source,
            }
        } else {
            DragEvent::Remove {
                item,
                container: parent,
                source,
            }
        };
        self.emit(event);
        self.cleanup();
    }

    // -- candidacy ----------------------------------------------------------

    /// Walk up from the raw node under the pointer to the draggable unit:
    /// the top-level child whose parent is a container.
    fn can_start(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        if self.session.is_some() && self.mirror.is_some() {
            return None;
        }
        if self.is_container_node(node) {
            // Containers are not draggable as units.
            return None;
        }
        let handle = node;
        let mut item = node;
        loop {
            let parent = self.env.parent(item)?;
            if self.is_container_node(parent) {
                break;
            }
            if self.behavior.invalid(item, handle) {
                return None;
            }
            item = parent;
        }
        let source = self.env.parent(item)?;
        if self.behavior.invalid(item, handle) {
            return None;
        }
        let sibling = self.env.next_sibling(item);
        if !self.behavior.moves(item, source, handle, sibling) {
            return None;
        }
        Some((item, source))
    }

    fn is_container_node(&self, node: NodeId) -> bool {
        self.containers.contains(&node) || self.behavior.is_container(node)
    }

    // -- session lifecycle --------------------------------------------------

    /// Create the session and announce it. Clones the item first when copy
    /// semantics apply.
    fn begin(&mut self, item: NodeId, source: NodeId) {
        let copy = if self.behavior.copy(item, source) {
            let clone = self.env.clone_node(item);
            self.emit(DragEvent::Cloned {
                clone,
                original: item,
                kind: CloneKind::Copy,
            });
            Some(clone)
        } else {
            None
        };
        let initial = self.env.next_sibling(item);
        self.session = Some(Session {
            item,
            source,
            initial_sibling: initial,
            current_sibling: initial,
            copy,
            last_drop_target: None,
            grab_offset: Point::ZERO,
        });
        debug!(item = %item, source = %source, copy = copy.is_some(), "drag start");
        self.emit(DragEvent::Drag { item, source });
    }

    /// Grabbed → Dragging: start the session, spawn the mirror, and run the
    /// first resolution pass at the promoting move's position.
    fn promote(&mut self, grab: Grab, pos: Point) {
        self.end();
        self.begin(grab.item, grab.source);
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (item, copy) = (s.item, s.copy);
        let offset = pos - self.env.bounding_box(item).origin();
        if let Some(s) = self.session.as_mut() {
            s.grab_offset = offset;
        }
        let in_transit = copy.unwrap_or(item);
        self.env.set_marker(in_transit, Marker::Transit, true);
        self.spawn_mirror();
        self.drag_move(pos);
    }

    fn spawn_mirror(&mut self) {
        if self.mirror.is_some() {
            return;
        }
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let item = s.item;
        let root = self.options.mirror_root.unwrap_or_else(|| self.env.root());
        let tracker = mirror::spawn(&mut self.env, item, root);
        self.mirror = Some(tracker);
        self.emit(DragEvent::Cloned {
            clone: tracker.node,
            original: item,
            kind: CloneKind::Mirror,
        });
    }

    fn ungrab(&mut self) {
        self.grabbed = None;
    }

    /// Pointer-up: resolve the drop target under the release point and pick
    /// the terminal path.
    fn release(&mut self, pos: Point) {
        self.ungrab();
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (item, source, copy) = (s.copy.unwrap_or(s.item), s.source, s.copy);
        let hidden = self.mirror.map(|m| m.node);
        let behind = self.env.hit_test(pos, hidden);
        let target = behind.and_then(|b| self.find_drop_target(b, pos));
        match target {
            Some(t)
                if (copy.is_some() && self.options.copy_sort_source)
                    || copy.is_none()
                    || t != source =>
            {
                self.finish_drop(item, Some(t));
            }
            _ if self.options.remove_on_spill => self.remove(),
            _ => self.cancel(),
        }
    }

    /// Record the drop — or a `Cancel` when the item landed exactly where it
    /// started.
    fn finish_drop(&mut self, item: NodeId, target: Option<NodeId>) {
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (original, source, copy, current_sibling) =
            (s.item, s.source, s.copy, s.current_sibling);
        if copy.is_some() && self.options.copy_sort_source && target == Some(source) {
            // The copy sorted the source; the original yields its place.
            self.env.remove(original);
        }
        if self.is_initial_placement(target, None) {
            debug!(item = %item, "no-op drop");
            self.emit(DragEvent::Cancel {
                item,
                container: Some(source),
                source,
            });
        } else {
            debug!(item = %item, "drop");
            self.emit(DragEvent::Drop {
                item,
                target,
                source,
                sibling: current_sibling,
            });
        }
        self.cleanup();
    }

    fn cancel_impl(&mut self, revert: Option<bool>) {
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (source, copy, initial_sibling, current_sibling) =
            (s.source, s.copy, s.initial_sibling, s.current_sibling);
        let item = copy.unwrap_or(s.item);
        let reverts = revert.unwrap_or(self.options.revert_on_spill);
        let parent = self.env.parent(item);
        let initial = self.is_initial_placement(parent, None);
        if !initial && reverts {
            match copy {
                Some(clone) => {
                    if parent.is_some() {
                        self.env.remove(clone);
                    }
                }
                None => self.env.insert_before(source, item, initial_sibling),
            }
        }
        if initial || reverts {
            debug!(item = %item, "cancel");
            self.emit(DragEvent::Cancel {
                item,
                container: Some(source),
                source,
            });
        } else {
            self.emit(DragEvent::Drop {
                item,
                target: parent,
                source,
                sibling: current_sibling,
            });
        }
        self.cleanup();
    }

    /// Converging teardown for every terminal path.
    fn cleanup(&mut self) {
        let Some(s) = self.session.take() else {
            return;
        };
        let item = s.copy.unwrap_or(s.item);
        self.ungrab();
        if let Some(tracker) = self.mirror.take() {
            mirror::despawn(&mut self.env, tracker);
        }
        self.env.set_marker(item, Marker::Transit, false);
        if let Some(last) = s.last_drop_target {
            self.emit(DragEvent::Out {
                item,
                container: last,
                source: s.source,
            });
        }
        debug!(item = %item, "drag end");
        self.emit(DragEvent::DragEnd { item });
    }

    // -- resolution ---------------------------------------------------------

    /// Every pointer-move of an active drag: reposition the mirror,
    /// re-resolve the drop target, and relocate the in-transit node.
    fn drag_move(&mut self, pos: Point) {
        let Some(tracker) = self.mirror else {
            return;
        };
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let (original, source, copy, initial_sibling, last_target, grab_offset) = (
            s.item,
            s.source,
            s.copy,
            s.initial_sibling,
            s.last_drop_target,
            s.grab_offset,
        );

        let frame = mirror::frame_at(&self.env, &tracker, pos, grab_offset);
        self.env.set_frame(tracker.node, frame);

        let item = copy.unwrap_or(original);
        let behind = self.env.hit_test(pos, Some(tracker.node));
        let drop_target = behind.and_then(|b| self.find_drop_target(b, pos));
        trace!(?pos, target = ?drop_target, "resolve");

        let changed = drop_target.is_some() && drop_target != last_target;
        if changed || drop_target.is_none() {
            if let Some(prev) = last_target {
                self.emit(DragEvent::Out {
                    item,
                    container: prev,
                    source,
                });
                if self.options.remove_on_spill {
                    self.env.set_marker(item, Marker::Hidden, true);
                }
            }
            if let Some(s) = self.session.as_mut() {
                s.last_drop_target = drop_target;
            }
            if changed && let Some(target) = drop_target {
                self.emit(DragEvent::Over {
                    item,
                    container: target,
                    source,
                });
                if self.options.remove_on_spill {
                    self.env.set_marker(item, Marker::Hidden, false);
                }
            }
        }

        let parent = self.env.parent(item);
        if drop_target == Some(source) && copy.is_some() && !self.options.copy_sort_source {
            // The source already holds the original; the copy must not
            // appear in it while dragging.
            if parent.is_some() {
                self.env.remove(item);
            }
            return;
        }
        let immediate = match (drop_target, behind) {
            (Some(target), Some(behind)) => resolver::immediate_child(&self.env, target, behind),
            _ => None,
        };
        let (target, reference) = match (drop_target, immediate) {
            (Some(target), Some(immediate)) => (
                target,
                resolver::reference_point(
                    &self.env,
                    self.options.direction,
                    target,
                    immediate,
                    pos,
                ),
            ),
            _ if self.options.revert_on_spill && copy.is_none() => {
                // Provisionally return the item to where it came from.
                (source, initial_sibling)
            }
            _ => {
                if copy.is_some() && parent.is_some() {
                    self.env.remove(item);
                }
                return;
            }
        };
        let next = self.env.next_sibling(item);
        if (reference.is_none() && changed) || (reference != Some(item) && reference != next) {
            if let Some(s) = self.session.as_mut() {
                s.current_sibling = reference;
            }
            self.env.insert_before(target, item, reference);
            self.emit(DragEvent::Shadow {
                item,
                container: target,
                source,
            });
        }
    }

    /// Climb from the hit node to the nearest accepting container.
    fn find_drop_target(&self, behind: NodeId, pos: Point) -> Option<NodeId> {
        let mut target = Some(behind);
        while let Some(node) = target {
            if self.accepted(node, behind, pos) {
                return Some(node);
            }
            target = self.env.parent(node);
        }
        None
    }

    fn accepted(&self, target: NodeId, behind: NodeId, pos: Point) -> bool {
        if !self.is_container_node(target) {
            return false;
        }
        let Some(s) = self.session.as_ref() else {
            return false;
        };
        let Some(immediate) = resolver::immediate_child(&self.env, target, behind) else {
            return false;
        };
        let reference =
            resolver::reference_point(&self.env, self.options.direction, target, immediate, pos);
        if self.is_initial_placement(Some(target), Some(reference)) {
            // Dropping it right back where it was is always legal.
            return true;
        }
        self.behavior.accepts(s.item, target, s.source, reference)
    }

    /// Would placing the item before `sibling` in `target` leave it exactly
    /// where the session started?
    fn is_initial_placement(
        &self,
        target: Option<NodeId>,
        sibling_override: Option<Option<NodeId>>,
    ) -> bool {
        let Some(s) = self.session.as_ref() else {
            return false;
        };
        let sibling = match sibling_override {
            Some(sibling) => sibling,
            None if self.mirror.is_some() => s.current_sibling,
            None => self.env.next_sibling(s.copy.unwrap_or(s.item)),
        };
        target == Some(s.source) && sibling == s.initial_sibling
    }

    fn emit(&mut self, event: DragEvent) {
        trace!(?event, "emit");
        self.sink.emit(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
