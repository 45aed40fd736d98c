//! rankview-diff
//!
//! Pure comparison of a baseline ranking against an enhanced one. Nothing here
//! touches shared state; the same inputs always give the same output.
use rankview_core::types::{ComparisonSummary, ItemId, ResultSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Summarizes how `enhanced` reorders `baseline`.
///
/// Only improvements are counted: an item that moved toward rank 1 adds to
/// `improved_rank_count` and to the running improvement total, an item that
/// stayed put or dropped adds nothing.
pub fn diff(baseline: &ResultSet, enhanced: &ResultSet) -> ComparisonSummary {
    let base_index: HashMap<&str, usize> = baseline.ids().enumerate().map(|(i, id)| (id, i)).collect();

    let mut improved = 0usize;
    let mut total_improvement = 0usize;
    for (ai_index, id) in enhanced.ids().enumerate() {
        if let Some(&b) = base_index.get(id) {
            if b > ai_index { improved += 1; total_improvement += b - ai_index; }
        }
    }

    let enhanced_ids: HashSet<&str> = enhanced.ids().collect();
    let new_product_count = enhanced_ids.iter().filter(|id| !base_index.contains_key(*id)).count();
    let removed_product_count = base_index.keys().filter(|id| !enhanced_ids.contains(*id)).count();

    ComparisonSummary {
        total_product_count: enhanced.len(),
        improved_rank_count: improved,
        new_product_count,
        removed_product_count,
        average_rank_improvement: if improved > 0 { total_improvement as f64 / improved as f64 } else { 0.0 },
    }
}

/// How one item's rank changed between the two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "places", rename_all = "lowercase")]
pub enum RankChange {
    Improved(usize),
    Unchanged,
    Declined(usize),
    New,
    Removed,
}

/// Per-item rank positions (0-based) in both lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankDelta {
    pub id: ItemId,
    pub baseline_rank: Option<usize>,
    pub enhanced_rank: Option<usize>,
}

impl RankDelta {
    /// `baseline - enhanced`; positive means the item moved toward rank 1.
    pub fn signed(&self) -> Option<i64> {
        Some(self.baseline_rank? as i64 - self.enhanced_rank? as i64)
    }

    pub fn change(&self) -> RankChange {
        match (self.baseline_rank, self.enhanced_rank) {
            (Some(b), Some(e)) if b > e => RankChange::Improved(b - e),
            (Some(b), Some(e)) if b < e => RankChange::Declined(e - b),
            (Some(_), Some(_)) => RankChange::Unchanged,
            (None, _) => RankChange::New,
            (Some(_), None) => RankChange::Removed,
        }
    }
}

/// Rank deltas for every item of either list: enhanced order first, then the
/// items only the baseline had, in baseline order.
pub fn rank_deltas(baseline: &ResultSet, enhanced: &ResultSet) -> Vec<RankDelta> {
    let base_index: HashMap<&str, usize> = baseline.ids().enumerate().map(|(i, id)| (id, i)).collect();
    let mut out: Vec<RankDelta> = enhanced
        .ids()
        .enumerate()
        .map(|(e, id)| RankDelta { id: id.to_string(), baseline_rank: base_index.get(id).copied(), enhanced_rank: Some(e) })
        .collect();
    let enhanced_ids: HashSet<&str> = enhanced.ids().collect();
    out.extend(
        baseline
            .ids()
            .enumerate()
            .filter(|(_, id)| !enhanced_ids.contains(id))
            .map(|(b, id)| RankDelta { id: id.to_string(), baseline_rank: Some(b), enhanced_rank: None }),
    );
    out
}
