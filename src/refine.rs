//! S6 — CP refiner, implemented as a local-search substitute.
//!
//! No CP/MIP solver crate exists anywhere in this crate's dependency stack,
//! so per design notes this stage is a coordinate-descent local search that
//! preserves the same contract a CP-SAT model would: non-overlap, hub/
//! corridor touch, a weighted Manhattan-distance objective, and a time
//! budget. Grounded on `solve_rect_pack`/`solve_with_corridor` in the
//! retrieval pack's CP-SAT prototype for the objective and hinting
//! behavior, with the search mechanics themselves original to this crate
//! (no local-search port existed to draw from).

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::brief::{Brief, LayoutResult};
use crate::constants::{REFINE_TIME_LIMIT_S, REFINE_TIME_LIMIT_WITH_CORRIDOR_S};
use crate::errors::RefineOutcome;
use crate::pack::choose_hub;

/// Weighted Manhattan-distance objective: sum over preferred-adjacency
/// pairs of their center distance, plus hub distance for every room,
/// both weighted per the brief's soft weights.
fn objective(layout: &LayoutResult, brief: &Brief) -> f64 {
    let mut total = 0.0;
    for (a, b, weight) in brief.all_adjacency_pairs() {
        if let (Some(ra), Some(rb)) = (layout.get(&a), layout.get(&b)) {
            let (ax, ay) = ra.center();
            let (bx, by) = rb.center();
            total += weight * ((ax - bx).abs() + (ay - by).abs());
        }
    }

    if let Some(hub_name) = choose_hub(brief) {
        if let Some(hub) = layout.get(hub_name) {
            let (hx, hy) = hub.center();
            for room in &layout.rooms {
                if room.name == hub_name {
                    continue;
                }
                let (rx, ry) = room.center();
                total += brief.weights.hub_distance * ((hx - rx).abs() + (hy - ry).abs());
            }
        }
    }

    total
}

fn satisfies_hard_postconditions(layout: &LayoutResult, brief: &Brief) -> bool {
    if layout.has_overlap() {
        return false;
    }
    match (layout.corridor(), choose_hub(brief)) {
        (Some(corridor), _) => layout
            .rooms
            .iter()
            .filter(|r| !r.is_corridor)
            .all(|r| r.shared_edge_length(corridor) > 0.0 || layout.rooms.len() == 1),
        (None, Some(hub)) => {
            let Some(hub_room) = layout.get(hub) else {
                return true;
            };
            layout
                .rooms
                .iter()
                .filter(|r| r.name != hub)
                .all(|r| r.touches_or_overlaps(hub_room))
        }
        (None, None) => true,
    }
}

/// Refine `layout` in place via bounded coordinate-descent local search,
/// seeded from the incoming positions (the local-search analogue of a
/// CP-SAT warm-start hint). Returns the solver-style outcome; the caller
/// should only keep the refined layout when `outcome.accepts_result()`.
pub fn refine_layout(layout: &LayoutResult, brief: &Brief, seed: u64) -> (LayoutResult, RefineOutcome) {
    let time_limit = if layout.corridor().is_some() {
        REFINE_TIME_LIMIT_WITH_CORRIDOR_S
    } else {
        REFINE_TIME_LIMIT_S
    };
    let deadline = Instant::now() + Duration::from_secs_f64(time_limit);

    let mut best = layout.clone();
    let mut best_score = objective(&best, brief);
    let hard_ok_at_start = satisfies_hard_postconditions(&best, brief);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let steps = [5.0_f64, 10.0, 20.0];

    let mut improved_any = false;
    while Instant::now() < deadline {
        if best.rooms.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..best.rooms.len());
        if best.rooms[idx].is_corridor {
            continue;
        }
        let axis_x = rng.gen_bool(0.5);
        let step = steps[rng.gen_range(0..steps.len())] * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        let mut candidate = best.clone();
        {
            let room = &mut candidate.rooms[idx];
            if axis_x {
                room.x = (room.x + step).clamp(0.0, brief.envelope_w - room.w);
            } else {
                room.y = (room.y + step).clamp(0.0, brief.envelope_h - room.h);
            }
        }

        if candidate.has_overlap() {
            continue;
        }
        // Once the hard postconditions are satisfied, never accept a move
        // that breaks them again.
        if hard_ok_at_start && !satisfies_hard_postconditions(&candidate, brief) {
            continue;
        }

        let score = objective(&candidate, brief);
        if score <= best_score {
            if score < best_score {
                improved_any = true;
            }
            best = candidate;
            best_score = score;
        }
    }

    let outcome = if !satisfies_hard_postconditions(&best, brief) {
        RefineOutcome::Infeasible
    } else if improved_any {
        RefineOutcome::Optimal
    } else if hard_ok_at_start {
        RefineOutcome::Feasible
    } else {
        RefineOutcome::Unknown
    };

    (best, outcome)
}
