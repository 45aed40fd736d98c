//! Time-boxed reorder animations.
//!
//! One cycle at a time: starting a cycle cancels the previous cycle's timer
//! and replaces every active instruction, so no id is ever animated by two
//! cycles. When the timer fires the instructions of that cycle are cleared.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use rankview_core::schedule::ScheduledTask;
use rankview_core::state::StateContainer;
use rankview_core::types::ItemId;

use crate::movement::{Direction, Movement};

/// Reverse-then-settle transform for one item: render at `start_offset_y`
/// (its old position), then ease to 0 over `duration`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationInstruction {
    pub id: ItemId,
    pub direction: Direction,
    pub start_offset_y: f64,
    pub distance_units: u32,
    pub duration: Duration,
    pub cycle: u64,
}

impl AnimationInstruction {
    fn new(movement: &Movement, duration: Duration, cycle: u64) -> Self {
        Self {
            id: movement.id.clone(),
            direction: movement.direction,
            start_offset_y: movement.delta_y,
            distance_units: movement.distance_units,
            duration,
            cycle,
        }
    }

    /// Linear offset `elapsed` into the animation; 0 once it is over.
    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.duration || self.duration.is_zero() { return 0.0; }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.start_offset_y * (1.0 - progress)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationFrame {
    pub cycle: u64,
    pub active: HashMap<ItemId, AnimationInstruction>,
    timer: Option<ScheduledTask>,
}

impl AnimationFrame {
    pub fn is_animating(&self) -> bool { !self.active.is_empty() }

    fn clear_cycle(&mut self, cycle: u64) -> bool {
        if self.cycle != cycle || self.active.is_empty() { return false; }
        self.active.clear();
        self.timer = None;
        true
    }
}

pub struct AnimationBoard {
    frame: Arc<StateContainer<AnimationFrame>>,
    duration: Duration,
}

impl AnimationBoard {
    pub fn new(duration: Duration) -> Self { Self { frame: Arc::new(StateContainer::default()), duration } }

    pub fn duration(&self) -> Duration { self.duration }

    pub fn frame(&self) -> AnimationFrame { self.frame.snapshot() }

    pub fn subscribe(&self) -> watch::Receiver<AnimationFrame> { self.frame.subscribe() }

    /// Replaces whatever is running with instructions for the moved items.
    /// Must be called inside a tokio runtime. Returns the new cycle number.
    pub fn start_cycle(&self, movements: &[Movement]) -> u64 {
        let duration = self.duration;
        let container = Arc::clone(&self.frame);
        let mut cycle = 0;
        self.frame.update(|f| {
            if let Some(timer) = f.timer.take() { timer.cancel(); }
            f.cycle += 1;
            cycle = f.cycle;
            f.active = movements
                .iter()
                .filter(|m| m.moved)
                .map(|m| (m.id.clone(), AnimationInstruction::new(m, duration, cycle)))
                .collect();
            if f.is_animating() {
                f.timer = Some(ScheduledTask::after(duration, async move {
                    if container.update_if(|f| f.clear_cycle(cycle)) { debug!(cycle, "animation cycle finished"); }
                }));
            }
        });
        debug!(cycle, animated = self.frame.read(|f| f.active.len()), "animation cycle started");
        cycle
    }

    /// Stops the running cycle, if any, and clears its instructions.
    pub fn cancel(&self) {
        self.frame.update_if(|f| {
            let mut had_timer = false;
            if let Some(timer) = f.timer.take() {
                timer.cancel();
                had_timer = true;
            }
            let was_animating = f.is_animating();
            f.active.clear();
            had_timer || was_animating
        });
    }
}
