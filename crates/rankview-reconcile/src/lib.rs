//! rankview-reconcile
//!
//! Snapshot, mutate, measure, animate. The reconciler reads item positions
//! through a `LayoutProvider` before and after the surface re-renders and
//! turns the difference into movements and animation instructions. It never
//! looks at ranks.
pub mod animation;
pub mod layout;
pub mod movement;
pub mod snapshot;

pub use animation::{AnimationBoard, AnimationFrame, AnimationInstruction};
pub use layout::StackedLayout;
pub use movement::{measure, Direction, Movement};
pub use snapshot::PositionSnapshot;

use std::time::Duration;

use rankview_core::config::ReconcileSettings;
use rankview_core::traits::LayoutProvider;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileConfig {
    /// Pixel displacement an item must exceed to count as moved.
    pub move_threshold: f64,
    /// Pixels per display unit in `Movement::distance_units`.
    pub distance_unit: f64,
    /// Total animation duration.
    pub duration: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self { Self { move_threshold: 5.0, distance_unit: 10.0, duration: Duration::from_millis(1000) } }
}

impl From<&ReconcileSettings> for ReconcileConfig {
    fn from(s: &ReconcileSettings) -> Self {
        Self { move_threshold: s.move_threshold_px, distance_unit: s.distance_unit_px, duration: Duration::from_millis(s.animation_ms) }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionReconciler {
    config: ReconcileConfig,
}

impl PositionReconciler {
    pub fn new(config: ReconcileConfig) -> Self { Self { config } }

    pub fn config(&self) -> &ReconcileConfig { &self.config }

    /// Captures the before snapshot for `ids`.
    pub fn begin<'a, I>(&self, ids: I, layout: &dyn LayoutProvider) -> ReconcileCycle
    where
        I: IntoIterator<Item = &'a str>,
    {
        ReconcileCycle { before: PositionSnapshot::capture(ids, layout), config: self.config }
    }
}

/// One measurement pass. Holds the before snapshot until `finish` consumes it.
#[derive(Debug, Clone)]
pub struct ReconcileCycle {
    before: PositionSnapshot,
    config: ReconcileConfig,
}

impl ReconcileCycle {
    pub fn before(&self) -> &PositionSnapshot { &self.before }

    /// Captures the after snapshot for the same ids and measures.
    pub fn finish(self, layout: &dyn LayoutProvider) -> Vec<Movement> {
        let after = PositionSnapshot::capture(self.before.ids(), layout);
        measure(&self.before, &after, &self.config)
    }
}
