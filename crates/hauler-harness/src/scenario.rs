#![forbid(unsafe_code)]

//! Scripted drag scenarios over a fixed two-list world.
//!
//! The world is a 300x200 root with two vertical lists: `left` at x 0..100
//! and `right` at x 150..250, each holding 20-tall items stacked from y 0.
//! The band between them (x 100..150) belongs to no container, which is what
//! makes spill behavior scriptable.

use serde::{Deserialize, Serialize};

use hauler_core::testenv::TestTree;
use hauler_core::{
    Axis, DragBehavior, DragEngine, DragEvent, NodeId, Options, Point, PointerEvent, Recorder,
    Rect, TreeEnv,
};

/// The two-list fixture.
pub struct TwoLists {
    pub tree: TestTree,
    pub left: NodeId,
    pub right: NodeId,
    pub left_items: Vec<NodeId>,
    pub right_items: Vec<NodeId>,
}

/// Build the fixture with the given item counts.
#[must_use]
pub fn two_lists(left_items: usize, right_items: usize) -> TwoLists {
    let mut tree = TestTree::new(Rect::new(0.0, 0.0, 300.0, 200.0));
    let root = tree.root();
    let left = tree.add_container(root, Rect::new(0.0, 0.0, 100.0, 200.0), Axis::Vertical);
    let right = tree.add_container(root, Rect::new(150.0, 0.0, 100.0, 200.0), Axis::Vertical);
    let left_items = (0..left_items).map(|_| tree.add_item(left, 20.0)).collect();
    let right_items = (0..right_items).map(|_| tree.add_item(right, 20.0)).collect();
    TwoLists {
        tree,
        left,
        right,
        left_items,
        right_items,
    }
}

/// Drag policy under test. The constant-returning normalization of the
/// boolean `copy` configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Items move out of their source.
    Move,
    /// Items are copied; the original stays put.
    Copy,
}

impl DragBehavior for Policy {
    fn copy(&self, _item: NodeId, _source: NodeId) -> bool {
        matches!(self, Policy::Copy)
    }
}

/// One scripted input or finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Pointer-down with the primary button.
    Down { x: f32, y: f32 },
    /// Pointer-move with the primary button held.
    Move { x: f32, y: f32 },
    /// Pointer-up.
    Up { x: f32, y: f32 },
    /// Explicit `cancel()`.
    Cancel,
    /// Explicit `cancel_with(true)`.
    CancelRevert,
    /// Explicit `remove()`.
    Remove,
    /// Explicit `end()`.
    End,
}

/// A named script: world shape, configuration, and steps.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub policy: Policy,
    pub options: Options,
    pub left_items: usize,
    pub right_items: usize,
    pub steps: Vec<Step>,
}

/// A completed run: the engine (with its mutated world) and the event trace.
pub struct Run {
    pub engine: DragEngine<TestTree, Policy>,
    pub left: NodeId,
    pub right: NodeId,
    pub left_items: Vec<NodeId>,
    pub right_items: Vec<NodeId>,
    pub events: Vec<DragEvent>,
}

impl Run {
    /// Current children of the left list.
    #[must_use]
    pub fn left_children(&self) -> Vec<NodeId> {
        self.engine.env().children(self.left)
    }

    /// Current children of the right list.
    #[must_use]
    pub fn right_children(&self) -> Vec<NodeId> {
        self.engine.env().children(self.right)
    }

    /// The terminal events of the trace, in order.
    #[must_use]
    pub fn terminals(&self) -> Vec<DragEvent> {
        self.events
            .iter()
            .filter(|e| e.is_terminal())
            .copied()
            .collect()
    }
}

impl Scenario {
    /// Execute every step and capture the trace.
    #[must_use]
    pub fn run(&self) -> Run {
        let world = two_lists(self.left_items, self.right_items);
        let recorder = Recorder::new();
        let mut engine = DragEngine::new(world.tree, self.policy)
            .with_options(self.options.clone())
            .with_sink(recorder.clone());
        engine.add_container(world.left);
        engine.add_container(world.right);

        for step in &self.steps {
            tracing::debug!(scenario = self.name, ?step, "step");
            match *step {
                Step::Down { x, y } => engine.on_pointer_down(PointerEvent::new(Point::new(x, y))),
                Step::Move { x, y } => engine.on_pointer_move(PointerEvent::new(Point::new(x, y))),
                Step::Up { x, y } => engine.on_pointer_up(PointerEvent::released(Point::new(x, y))),
                Step::Cancel => engine.cancel(),
                Step::CancelRevert => engine.cancel_with(true),
                Step::Remove => engine.remove(),
                Step::End => engine.end(),
            }
        }

        Run {
            engine,
            left: world.left,
            right: world.right,
            left_items: world.left_items,
            right_items: world.right_items,
            events: recorder.events(),
        }
    }
}

/// Serializable trace of one run.
#[derive(Debug, Serialize)]
pub struct Trace<'a> {
    pub scenario: &'a str,
    pub events: &'a [DragEvent],
}

/// The reference scenario set replayed by the harness binary.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "move-across",
            policy: Policy::Move,
            options: Options::default(),
            left_items: 2,
            right_items: 1,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 160.0, y: 50.0 },
                Step::Up { x: 160.0, y: 50.0 },
            ],
        },
        Scenario {
            name: "reorder-in-place",
            policy: Policy::Move,
            options: Options::default(),
            left_items: 3,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 5.0, y: 50.0 },
                Step::Up { x: 5.0, y: 50.0 },
            ],
        },
        Scenario {
            name: "no-op-drop",
            policy: Policy::Move,
            options: Options::default(),
            left_items: 2,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Up { x: 5.0, y: 6.0 },
            ],
        },
        Scenario {
            name: "copy-across",
            policy: Policy::Copy,
            options: Options::default(),
            left_items: 1,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 160.0, y: 50.0 },
                Step::Up { x: 160.0, y: 50.0 },
            ],
        },
        Scenario {
            name: "remove-on-spill",
            policy: Policy::Move,
            options: Options {
                remove_on_spill: true,
                ..Default::default()
            },
            left_items: 2,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 120.0, y: 150.0 },
                Step::Up { x: 120.0, y: 150.0 },
            ],
        },
        Scenario {
            name: "revert-on-spill",
            policy: Policy::Move,
            options: Options {
                revert_on_spill: true,
                ..Default::default()
            },
            left_items: 2,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 5.0, y: 35.0 },
                Step::Move { x: 120.0, y: 150.0 },
                Step::Up { x: 120.0, y: 150.0 },
            ],
        },
        Scenario {
            name: "abandoned-mid-drag",
            policy: Policy::Move,
            options: Options::default(),
            left_items: 2,
            right_items: 0,
            steps: vec![
                Step::Down { x: 5.0, y: 5.0 },
                Step::Move { x: 5.0, y: 6.0 },
                Step::Move { x: 5.0, y: 35.0 },
                Step::CancelRevert,
            ],
        },
    ]
}
