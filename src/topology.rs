//! S2 — Topology seeder.
//!
//! Produces a small number of schematic layouts from coarse rules of thumb
//! (living/kitchen along the top row, bedrooms along the second row,
//! bathrooms tucked beside them), grounded on `propose_topologies` in the
//! retrieval pack's learned-placement prototype.

use crate::brief::{is_bedroom, Brief, LayoutResult, PlacedRoom};
use crate::constants::TOPOLOGY_CANDIDATE_COUNT;

/// Propose `k` topology-only candidate layouts for a brief. Each candidate
/// places every room somewhere inside the envelope using only coarse
/// row-based rules — later stages (pack/refine/repair) are responsible for
/// making these non-overlapping and well-sized.
pub fn propose_topologies(brief: &Brief, k: usize) -> Vec<LayoutResult> {
    (0..k).map(|_| propose_one(brief)).collect()
}

fn propose_one(brief: &Brief) -> LayoutResult {
    let w = brief.envelope_w;
    let mut rooms = Vec::with_capacity(brief.rooms.len());

    let mut cursor_x = 0.0_f64;
    let top_row_h = 300.0_f64;
    let mut placed_top = false;

    let mut living_kitchen: Vec<&str> = Vec::new();
    let mut bedrooms: Vec<&str> = Vec::new();
    let mut bathrooms: Vec<&str> = Vec::new();
    let mut rest: Vec<&str> = Vec::new();

    for r in &brief.rooms {
        let n = r.name.to_lowercase();
        if n.starts_with("living") || n.starts_with("kitchen") {
            living_kitchen.push(&r.name);
        } else if is_bedroom(&n) {
            bedrooms.push(&r.name);
        } else if n.starts_with("bath") {
            bathrooms.push(&r.name);
        } else {
            rest.push(&r.name);
        }
    }

    for name in &living_kitchen {
        let rw = if name.to_lowercase().starts_with("living") {
            (w / 3.0).min(500.0)
        } else {
            (w / 4.0).min(300.0)
        };
        rooms.push(PlacedRoom {
            name: name.to_string(),
            x: cursor_x,
            y: 0.0,
            w: rw,
            h: top_row_h,
            is_corridor: false,
        });
        cursor_x += rw;
        placed_top = true;
    }

    let second_row_y = if placed_top { top_row_h } else { 0.0 };
    cursor_x = 0.0;
    for name in &bedrooms {
        let rw = (w / 3.0).min(300.0);
        if cursor_x + rw > w {
            cursor_x = 0.0;
        }
        rooms.push(PlacedRoom {
            name: name.to_string(),
            x: cursor_x,
            y: second_row_y,
            w: rw,
            h: 300.0,
            is_corridor: false,
        });
        cursor_x += rw;
    }

    let anchor = rooms.last().cloned();
    for (idx, name) in bathrooms.iter().enumerate() {
        let (ax, ay) = anchor
            .as_ref()
            .map(|a| (a.x, a.y))
            .unwrap_or((0.0, second_row_y));
        rooms.push(PlacedRoom {
            name: name.to_string(),
            x: ax + (idx as f64 + 1.0) * 10.0,
            y: ay,
            w: 200.0,
            h: 200.0,
            is_corridor: false,
        });
    }

    let mut rest_x = 0.0;
    let rest_y = second_row_y + 300.0;
    for name in &rest {
        rooms.push(PlacedRoom {
            name: name.to_string(),
            x: rest_x,
            y: rest_y,
            w: (w / 3.0).min(300.0),
            h: 300.0,
            is_corridor: false,
        });
        rest_x += (w / 3.0).min(300.0);
    }

    LayoutResult {
        rooms,
        dropped: vec![],
    }
}

/// Default candidate count this stage proposes, per constants.
pub fn default_topology_candidates(brief: &Brief) -> Vec<LayoutResult> {
    propose_topologies(brief, TOPOLOGY_CANDIDATE_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::RoomSpec;

    fn spec(name: &str) -> RoomSpec {
        RoomSpec {
            name: name.to_string(),
            target_area: 90_000.0,
            min_w: 200.0,
            min_h: 200.0,
            fixed: false,
        }
    }

    #[test]
    fn every_room_gets_placed() {
        let brief = Brief {
            rooms: vec![spec("living"), spec("kitchen"), spec("bed1"), spec("bath1")],
            envelope_w: 2000.0,
            envelope_h: 1200.0,
            hard: Default::default(),
            soft: Default::default(),
            weights: Default::default(),
            adjacency_preferences: vec![],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: None,
            tenant_id: None,
            consent_external: false,
            floors: 1,
        };
        let candidates = propose_topologies(&brief, 2);
        assert_eq!(candidates.len(), 2);
        for c in &candidates {
            assert_eq!(c.rooms.len(), brief.rooms.len());
        }
    }
}
