use serde::{Deserialize, Serialize};

use rankview_core::types::ItemId;

use crate::snapshot::PositionSnapshot;
use crate::ReconcileConfig;

/// Screen direction of a move. `Up` means toward the top of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Measured displacement of one item across a re-render.
///
/// `distance_units` is a coarse display figure derived from pixels. It is not
/// a rank delta and may disagree with one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: ItemId,
    pub delta_y: f64,
    pub moved: bool,
    pub direction: Direction,
    pub distance_units: u32,
}

impl Movement {
    pub fn classify(id: ItemId, delta_y: f64, config: &ReconcileConfig) -> Self {
        let magnitude = delta_y.abs();
        Self {
            id,
            delta_y,
            moved: magnitude > config.move_threshold,
            direction: if delta_y > 0.0 { Direction::Up } else { Direction::Down },
            distance_units: (magnitude / config.distance_unit).round() as u32,
        }
    }
}

/// Movements for every id present in both snapshots, in `before` order.
pub fn measure(before: &PositionSnapshot, after: &PositionSnapshot, config: &ReconcileConfig) -> Vec<Movement> {
    before
        .ids()
        .filter_map(|id| {
            let (b, a) = (before.get(id)?, after.get(id)?);
            Some(Movement::classify(id.to_string(), b.top - a.top, config))
        })
        .collect()
}
