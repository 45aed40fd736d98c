use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use rankview_core::traits::{LayoutProvider, Rect};
use rankview_reconcile::{
    measure, AnimationBoard, Direction, Movement, PositionReconciler, PositionSnapshot, ReconcileConfig, StackedLayout,
};

struct FixedLayout(HashMap<&'static str, f64>);

impl LayoutProvider for FixedLayout {
    fn rect(&self, item_id: &str) -> Option<Rect> { self.0.get(item_id).map(|&top| Rect { top, height: 40.0 }) }
}

fn layout(tops: &[(&'static str, f64)]) -> FixedLayout { FixedLayout(tops.iter().copied().collect()) }

fn moved(id: &str, delta_y: f64) -> Movement { Movement::classify(id.into(), delta_y, &ReconcileConfig::default()) }

#[test]
fn threshold_is_exclusive() {
    let cfg = ReconcileConfig::default();
    assert!(!Movement::classify("a".into(), 5.0, &cfg).moved);
    assert!(!Movement::classify("a".into(), -5.0, &cfg).moved);
    assert!(!Movement::classify("a".into(), 0.0, &cfg).moved);
    let up = Movement::classify("a".into(), 6.0, &cfg);
    assert!(up.moved);
    assert_eq!(up.direction, Direction::Up);
    let down = Movement::classify("a".into(), -6.0, &cfg);
    assert!(down.moved);
    assert_eq!(down.direction, Direction::Down);
}

#[test]
fn distance_units_round_pixels() {
    assert_eq!(moved("a", 120.0).distance_units, 12);
    assert_eq!(moved("a", -44.0).distance_units, 4);
    assert_eq!(moved("a", 45.0).distance_units, 5);
    assert_eq!(moved("a", 3.0).distance_units, 0);
}

#[test]
fn measure_skips_ids_missing_from_either_snapshot() {
    let before = PositionSnapshot::capture(["a", "b", "c"], &layout(&[("a", 0.0), ("b", 100.0), ("c", 200.0)]));
    let after = PositionSnapshot::capture(["a", "b", "c"], &layout(&[("a", 100.0), ("b", 0.0)]));
    let movements = measure(&before, &after, &ReconcileConfig::default());
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].id, "a");
    assert_eq!(movements[0].delta_y, -100.0);
    assert_eq!(movements[0].direction, Direction::Down);
    assert_eq!(movements[1].id, "b");
    assert_eq!(movements[1].direction, Direction::Up);
    assert_eq!(movements[1].distance_units, 10);
}

#[test]
fn snapshot_ignores_unrendered_items() {
    let snap = PositionSnapshot::capture(["a", "ghost"], &layout(&[("a", 10.0)]));
    assert_eq!(snap.len(), 1);
    assert!(snap.get("ghost").is_none());
    assert_eq!(snap.get("a"), Some(Rect { top: 10.0, height: 40.0 }));
}

#[test]
fn reconciler_measures_a_reordered_stacked_list() {
    let reconciler = PositionReconciler::default();
    let before = StackedLayout::new(["a", "b", "c"], 50.0);
    let cycle = reconciler.begin(["a", "b", "c"], &before);
    assert_eq!(cycle.before().len(), 3);
    let after = StackedLayout::new(["c", "a", "b"], 50.0);
    let movements = cycle.finish(&after);
    let by_id: HashMap<_, _> = movements.iter().map(|m| (m.id.as_str(), m)).collect();
    assert_eq!(by_id["c"].direction, Direction::Up);
    assert_eq!(by_id["c"].delta_y, 100.0);
    assert_eq!(by_id["a"].direction, Direction::Down);
    assert_eq!(by_id["a"].distance_units, 5);
    assert!(movements.iter().all(|m| m.moved));
}

#[tokio::test(start_paused = true)]
async fn offset_settles_to_zero() {
    let board = AnimationBoard::new(ReconcileConfig::default().duration);
    board.start_cycle(&[moved("a", 100.0)]);
    let instr = board.frame().active["a"].clone();
    assert_eq!(instr.start_offset_y, 100.0);
    assert_eq!(instr.offset_at(Duration::ZERO), 100.0);
    assert_eq!(instr.offset_at(Duration::from_millis(500)), 50.0);
    assert_eq!(instr.offset_at(Duration::from_millis(1000)), 0.0);
}

#[tokio::test(start_paused = true)]
async fn only_moved_items_are_animated() {
    let board = AnimationBoard::new(Duration::from_millis(1000));
    let cycle = board.start_cycle(&[moved("a", 60.0), moved("b", 4.0), moved("c", -20.0)]);
    let frame = board.frame();
    assert_eq!(frame.cycle, cycle);
    assert_eq!(frame.active.len(), 2);
    assert!(frame.active.contains_key("a") && frame.active.contains_key("c"));
    assert_eq!(frame.active["c"].direction, Direction::Down);
}

#[tokio::test(start_paused = true)]
async fn animations_clear_after_duration() {
    let board = AnimationBoard::new(Duration::from_millis(1000));
    let started = Instant::now();
    board.start_cycle(&[moved("a", 60.0)]);
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(board.frame().is_animating());
    let mut rx = board.subscribe();
    rx.wait_for(|f| !f.is_animating()).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_previous_cycle() {
    let board = AnimationBoard::new(Duration::from_millis(1000));
    let first = board.start_cycle(&[moved("a", 60.0), moved("b", -60.0)]);
    tokio::time::sleep(Duration::from_millis(600)).await;
    let second = board.start_cycle(&[moved("b", 30.0)]);
    assert!(second > first);
    let frame = board.frame();
    assert_eq!(frame.active.len(), 1);
    assert_eq!(frame.active["b"].cycle, second);
    assert_eq!(frame.active["b"].direction, Direction::Up);

    // First timer would have fired at 1000ms.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(board.frame().active.contains_key("b"));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!board.frame().is_animating());
}

#[tokio::test(start_paused = true)]
async fn cancel_clears_immediately() {
    let board = AnimationBoard::new(Duration::from_millis(1000));
    board.start_cycle(&[moved("a", 60.0)]);
    board.cancel();
    assert!(!board.frame().is_animating());
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(!board.frame().is_animating());
}
