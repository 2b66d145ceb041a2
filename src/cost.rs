//! S10 — Soft-cost evaluator.
//!
//! Five weighted terms: missing preferred adjacencies, bedroom privacy,
//! aspect ratio deviation, area target deviation, and hub distance. The
//! first four are grounded on `evaluate_cost` in the retrieval pack's cost
//! prototype; `hub_distance` has no prototype counterpart (that prototype
//! only ever scored four terms) and is added fresh to give
//! `SoftWeights::hub_distance` something to weight.

use serde::{Deserialize, Serialize};

use crate::brief::{is_bedroom, Brief, LayoutResult};
use crate::graph::AdjacencyGraph;
use crate::pack::choose_hub;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub adjacency_missing: f64,
    pub bedroom_privacy: f64,
    pub aspect_ratio_deviation: f64,
    pub area_target_deviation: f64,
    pub hub_distance: f64,
}

impl CostBreakdown {
    pub fn total(&self, brief: &Brief) -> f64 {
        aggregate_cost(self, brief)
    }
}

/// Compute the unweighted cost breakdown for `layout` against `brief`.
pub fn evaluate_cost(brief: &Brief, layout: &LayoutResult) -> CostBreakdown {
    let graph = AdjacencyGraph::build(layout);

    let mut adjacency_missing = 0.0;
    for (a, b, weight) in brief.all_adjacency_pairs() {
        if !graph.are_adjacent(&a, &b) {
            adjacency_missing += weight;
        }
    }

    let bedroom_privacy = if brief.soft.enforce_privacy {
        let mut penalty = 0.0;
        for room in &layout.rooms {
            if !is_bedroom(&room.name) {
                continue;
            }
            for other in &layout.rooms {
                let n = other.name.to_lowercase();
                if !(n.starts_with("living") || n.starts_with("kitchen")) {
                    continue;
                }
                if room.touches_or_overlaps(other) {
                    penalty += 1.0;
                }
            }
        }
        penalty
    } else {
        0.0
    };

    let mut aspect_ratio_deviation = 0.0;
    for room in &layout.rooms {
        let ratio = room.aspect_ratio();
        let deviation = (ratio - brief.soft.aspect_ratio_target).abs();
        if deviation > brief.soft.aspect_ratio_tolerance {
            aspect_ratio_deviation += deviation - brief.soft.aspect_ratio_tolerance;
        }
    }

    let mut area_target_deviation = 0.0;
    for spec in &brief.rooms {
        if let Some(room) = layout.get(&spec.name) {
            if spec.target_area > 0.0 {
                area_target_deviation += (room.area() - spec.target_area).abs() / spec.target_area;
            }
        }
    }

    let mut hub_distance = 0.0;
    if let Some(hub_name) = choose_hub(brief) {
        if let Some(hub) = layout.get(hub_name) {
            let (hx, hy) = hub.center();
            let norm = (brief.envelope_w + brief.envelope_h).max(1.0);
            for room in &layout.rooms {
                if room.name == hub_name {
                    continue;
                }
                let (rx, ry) = room.center();
                hub_distance += ((hx - rx).abs() + (hy - ry).abs()) / norm;
            }
        }
    }

    CostBreakdown {
        adjacency_missing,
        bedroom_privacy,
        aspect_ratio_deviation,
        area_target_deviation,
        hub_distance,
    }
}

/// Weighted sum of the cost breakdown's terms.
pub fn aggregate_cost(cost: &CostBreakdown, brief: &Brief) -> f64 {
    cost.adjacency_missing * brief.weights.adjacency_missing
        + cost.bedroom_privacy * brief.weights.bedroom_privacy
        + cost.aspect_ratio_deviation * brief.weights.aspect_ratio_deviation
        + cost.area_target_deviation * brief.weights.area_target_deviation
        + cost.hub_distance * brief.weights.hub_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{AdjacencyPreference, PlacedRoom, RoomSpec};

    #[test]
    fn missing_adjacency_is_penalized() {
        let brief = Brief {
            rooms: vec![
                RoomSpec { name: "living".into(), target_area: 40_000.0, min_w: 100.0, min_h: 100.0, fixed: false },
                RoomSpec { name: "bed1".into(), target_area: 40_000.0, min_w: 100.0, min_h: 100.0, fixed: false },
            ],
            envelope_w: 1000.0,
            envelope_h: 1000.0,
            hard: Default::default(),
            soft: Default::default(),
            weights: Default::default(),
            adjacency_preferences: vec![],
            adjacency: vec![AdjacencyPreference { a: "living".into(), b: "bed1".into(), weight: 1.0 }],
            connectivity: None,
            pins: vec![],
            seed: None,
            tenant_id: None,
            consent_external: false,
            floors: 1,
        };
        let layout = LayoutResult {
            rooms: vec![
                PlacedRoom { name: "living".into(), x: 0.0, y: 0.0, w: 200.0, h: 200.0, is_corridor: false },
                PlacedRoom { name: "bed1".into(), x: 800.0, y: 800.0, w: 200.0, h: 200.0, is_corridor: false },
            ],
            dropped: vec![],
        };
        let cost = evaluate_cost(&brief, &layout);
        assert!(cost.adjacency_missing > 0.0);
    }
}
