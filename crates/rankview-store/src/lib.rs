//! rankview-store
//!
//! Holds the two result sets of the last completed job, which one is on
//! screen, and the comparison derived from them. Mode switches go through a
//! two-step `toggle_mode` / `complete_toggle` so the reconciler can measure
//! positions on both sides of the re-render.
use tokio::sync::watch;
use tracing::{debug, info};

use rankview_core::state::StateContainer;
use rankview_core::traits::{LayoutProvider, ResultSink};
use rankview_core::types::{ComparisonSummary, ResultKind, ResultSet};
use rankview_diff::RankDelta;
use rankview_reconcile::{AnimationBoard, Movement, PositionReconciler, PositionSnapshot, ReconcileConfig, ReconcileCycle};

#[derive(Debug, Clone)]
pub struct StoreState {
    pub mode: ResultKind,
    pub baseline: ResultSet,
    pub enhanced: ResultSet,
    /// The set that was on screen before the last toggle.
    pub previous_set: Option<ResultSet>,
    pub summary: ComparisonSummary,
    pub summary_visible: bool,
    pub rank_deltas: Vec<RankDelta>,
    generation: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            mode: ResultKind::Baseline,
            baseline: ResultSet::empty(ResultKind::Baseline),
            enhanced: ResultSet::empty(ResultKind::Enhanced),
            previous_set: None,
            summary: ComparisonSummary::default(),
            summary_visible: false,
            rank_deltas: Vec::new(),
            generation: 0,
        }
    }
}

impl StoreState {
    pub fn set(&self, kind: ResultKind) -> &ResultSet {
        match kind { ResultKind::Baseline => &self.baseline, ResultKind::Enhanced => &self.enhanced }
    }

    pub fn visible_set(&self) -> &ResultSet { self.set(self.mode) }
}

/// First half of a mode switch. Carries the before snapshot and is consumed by
/// `ResultStore::complete_toggle` once the surface has re-rendered.
#[derive(Debug)]
pub struct ToggleCycle {
    generation: u64,
    mode: ResultKind,
    pass: ReconcileCycle,
}

impl ToggleCycle {
    /// The mode that is now on screen.
    pub fn mode(&self) -> ResultKind { self.mode }
    pub fn before(&self) -> &PositionSnapshot { self.pass.before() }
}

pub struct ResultStore {
    state: StateContainer<StoreState>,
    reconciler: PositionReconciler,
    animations: AnimationBoard,
}

impl Default for ResultStore {
    fn default() -> Self { Self::new(ReconcileConfig::default()) }
}

impl ResultStore {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            state: StateContainer::default(),
            reconciler: PositionReconciler::new(config),
            animations: AnimationBoard::new(config.duration),
        }
    }

    pub fn state(&self) -> StoreState { self.state.snapshot() }
    pub fn subscribe(&self) -> watch::Receiver<StoreState> { self.state.subscribe() }
    pub fn animations(&self) -> &AnimationBoard { &self.animations }

    pub fn mode(&self) -> ResultKind { self.state.read(|s| s.mode) }
    pub fn visible_set(&self) -> ResultSet { self.state.read(|s| s.visible_set().clone()) }
    pub fn summary(&self) -> ComparisonSummary { self.state.read(|s| s.summary) }
    pub fn summary_visible(&self) -> bool { self.state.read(|s| s.summary_visible) }
    pub fn rank_deltas(&self) -> Vec<RankDelta> { self.state.read(|s| s.rank_deltas.clone()) }

    /// Replaces both sets and everything derived from them. The display goes
    /// back to the baseline list and any running animation stops.
    pub fn ingest(&self, baseline: ResultSet, enhanced: ResultSet) {
        let summary = rankview_diff::diff(&baseline, &enhanced);
        let rank_deltas = rankview_diff::rank_deltas(&baseline, &enhanced);
        info!(
            total = summary.total_product_count,
            improved = summary.improved_rank_count,
            new = summary.new_product_count,
            removed = summary.removed_product_count,
            "ingested result sets"
        );
        self.state.update(|s| {
            s.mode = ResultKind::Baseline;
            s.baseline = baseline;
            s.enhanced = enhanced;
            s.previous_set = None;
            s.summary = summary;
            s.summary_visible = false;
            s.rank_deltas = rank_deltas;
            s.generation += 1;
        });
        self.animations.cancel();
    }

    /// Snapshots the visible items, flips the mode and notifies subscribers so
    /// the surface re-renders.
    ///
    /// The layout is read outside the state lock. If the sets change while it
    /// is being measured, the snapshot is retaken against the new sets.
    pub fn toggle_mode(&self, layout: &dyn LayoutProvider) -> ToggleCycle {
        loop {
            let (seen, visible) = self.state.read(|s| (s.generation, s.visible_set().clone()));
            let pass = self.reconciler.begin(visible.ids(), layout);
            let (mut generation, mut mode) = (seen, ResultKind::Baseline);
            let flipped = self.state.update_if(|s| {
                if s.generation != seen { return false; }
                s.previous_set = Some(visible);
                s.mode = s.mode.toggled();
                s.summary_visible = s.mode == ResultKind::Enhanced;
                s.generation += 1;
                (generation, mode) = (s.generation, s.mode);
                true
            });
            if flipped {
                let cycle = ToggleCycle { generation, mode, pass };
                debug!(mode = ?cycle.mode, before = cycle.before().len(), "mode toggled");
                return cycle;
            }
            debug!(generation = seen, "sets replaced while measuring, retaking snapshot");
        }
    }

    /// Measures the re-rendered layout and starts the reorder animation.
    /// A cycle overtaken by a later toggle or ingest yields no movements.
    /// Must be called inside a tokio runtime.
    pub fn complete_toggle(&self, cycle: ToggleCycle, layout: &dyn LayoutProvider) -> Vec<Movement> {
        if self.state.read(|s| s.generation) != cycle.generation {
            debug!(generation = cycle.generation, "stale toggle ignored");
            return Vec::new();
        }
        let movements = cycle.pass.finish(layout);
        self.animations.start_cycle(&movements);
        movements
    }
}

impl ResultSink for ResultStore {
    fn ingest_completed_job(&self, baseline: ResultSet, enhanced: ResultSet) { self.ingest(baseline, enhanced) }
}
