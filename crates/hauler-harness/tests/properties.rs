//! Randomized gesture streams checked against the engine's event-order and
//! structural invariants.

use proptest::prelude::*;

use hauler_core::{
    DragEngine, DragEvent, NodeId, Options, Point, PointerEvent, Recorder, TreeEnv,
};
use hauler_harness::{Policy, Step, two_lists};

/// Every trace, no matter the input, satisfies:
/// - `Over`/`Out` strictly alternate and always name the same container;
/// - at most one terminal event per session, with `DragEnd` closing it;
/// - no event outside a session except a `Cloned` immediately before `Drag`.
fn check_stream(events: &[DragEvent]) {
    let mut in_session = false;
    let mut terminal_seen = false;
    let mut open: Option<NodeId> = None;
    for event in events {
        match *event {
            DragEvent::Drag { .. } => {
                assert!(!in_session, "nested session");
                in_session = true;
                terminal_seen = false;
            }
            DragEvent::Cloned { .. } => {
                assert!(!terminal_seen, "clone after terminal");
            }
            DragEvent::Shadow { .. } => {
                assert!(in_session && !terminal_seen, "shadow outside live session");
            }
            DragEvent::Over { container, .. } => {
                assert!(in_session && !terminal_seen, "over outside live session");
                assert_eq!(open, None, "over without intervening out");
                open = Some(container);
            }
            DragEvent::Out { container, .. } => {
                assert!(in_session, "out outside session");
                assert_eq!(open, Some(container), "out names the wrong container");
                open = None;
            }
            DragEvent::Drop { .. } | DragEvent::Cancel { .. } | DragEvent::Remove { .. } => {
                assert!(in_session, "terminal outside session");
                assert!(!terminal_seen, "second terminal in one session");
                terminal_seen = true;
            }
            DragEvent::DragEnd { .. } => {
                assert!(in_session && terminal_seen, "dragend without terminal");
                assert_eq!(open, None, "dangling over at dragend");
                in_session = false;
                terminal_seen = false;
            }
        }
    }
    assert!(!in_session, "trace ends inside a session");
}

fn coord() -> impl Strategy<Value = (f32, f32)> {
    (0.0f32..300.0, 0.0f32..200.0)
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => coord().prop_map(|(x, y)| Step::Down { x, y }),
        4 => coord().prop_map(|(x, y)| Step::Move { x, y }),
        2 => coord().prop_map(|(x, y)| Step::Up { x, y }),
        1 => Just(Step::Cancel),
        1 => Just(Step::Remove),
        1 => Just(Step::End),
    ]
}

fn apply(engine: &mut DragEngine<hauler_core::testenv::TestTree, Policy>, step: Step) {
    match step {
        Step::Down { x, y } => engine.on_pointer_down(PointerEvent::new(Point::new(x, y))),
        Step::Move { x, y } => engine.on_pointer_move(PointerEvent::new(Point::new(x, y))),
        Step::Up { x, y } => engine.on_pointer_up(PointerEvent::released(Point::new(x, y))),
        Step::Cancel => engine.cancel(),
        Step::CancelRevert => engine.cancel_with(true),
        Step::Remove => engine.remove(),
        Step::End => engine.end(),
    }
}

proptest! {
    #[test]
    fn arbitrary_gestures_keep_invariants(
        steps in proptest::collection::vec(step_strategy(), 0..48),
        copy in any::<bool>(),
        revert in any::<bool>(),
        remove in any::<bool>(),
    ) {
        let world = two_lists(3, 2);
        let recorder = Recorder::new();
        let policy = if copy { Policy::Copy } else { Policy::Move };
        let mut engine = DragEngine::new(world.tree, policy)
            .with_options(Options {
                revert_on_spill: revert,
                remove_on_spill: remove,
                ..Default::default()
            })
            .with_sink(recorder.clone());
        engine.add_container(world.left);
        engine.add_container(world.right);

        for step in steps {
            apply(&mut engine, step);
        }
        engine.destroy();
        prop_assert!(!engine.dragging());

        check_stream(&recorder.events());

        // Parent links stay consistent with child lists.
        for container in [world.left, world.right] {
            for child in engine.env().children(container) {
                prop_assert_eq!(engine.env().parent(child), Some(container));
            }
        }
    }

    /// Pressing an item and releasing without meaningful movement never
    /// reorders anything and always finalizes as a cancel.
    #[test]
    fn press_and_release_in_place_is_a_cancel(index in 0usize..3) {
        let world = two_lists(3, 0);
        let recorder = Recorder::new();
        let mut engine = DragEngine::new(world.tree, Policy::Move)
            .with_sink(recorder.clone());
        engine.add_container(world.left);
        engine.add_container(world.right);

        let y = 20.0 * index as f32 + 5.0;
        engine.on_pointer_down(PointerEvent::new(Point::new(5.0, y)));
        engine.on_pointer_move(PointerEvent::new(Point::new(5.0, y + 1.0)));
        engine.on_pointer_up(PointerEvent::released(Point::new(5.0, y + 1.0)));

        prop_assert_eq!(engine.env().children(world.left), world.left_items.clone());
        let terminals: Vec<_> = recorder
            .events()
            .into_iter()
            .filter(DragEvent::is_terminal)
            .collect();
        let cancelled_in_place = matches!(
            terminals[..],
            [DragEvent::Cancel { item, .. }] if item == world.left_items[index]
        );
        prop_assert!(cancelled_in_place, "terminals: {terminals:?}");
    }
}
