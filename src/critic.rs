//! S11 — Critic / candidate selector.
//!
//! Scores every candidate layout by building its scene, applying openings,
//! and computing `-(total_cost + 0.5 * daylight_penalty)`; the highest
//! score wins. Error-severity candidates are dropped unless doing so would
//! empty the set entirely. Grounded on `critic.py`/`proposal.py`/
//! `orchestrator.py` in the retrieval pack's learned-placement prototype.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::brief::{Brief, LayoutResult};
use crate::constants::{DAYLIGHT_PENALTY_WEIGHT, VARIANT_COUNT};
use crate::cost::evaluate_cost;
use crate::rules::{check, default_rules};
use crate::scene::{from_brief_and_layout, openings::apply_openings};

/// Generate `k` deterministic jittered variants of `base`, each nudging
/// every non-corridor room's position and size by a small index-derived
/// offset, clamped back into the envelope.
pub fn propose_variants(base: &LayoutResult, brief: &Brief, k: usize, seed: u64) -> Vec<LayoutResult> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..k)
        .map(|i| {
            let idx = i as f64 + 1.0;
            let sign_x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let sign_y = if (i + 1) % 2 == 0 { 1.0 } else { -1.0 };
            let sign_w = if i % 3 == 0 { 1.0 } else { -1.0 };
            let sign_h = if i % 3 == 0 { -1.0 } else { 1.0 };
            let jitter: f64 = rng.gen_range(0.8..1.2);

            let mut variant = base.clone();
            for room in variant.rooms.iter_mut() {
                if room.is_corridor {
                    continue;
                }
                room.x = (room.x + idx * 5.0 * sign_x * jitter).max(0.0).min(brief.envelope_w - room.w);
                room.y = (room.y + idx * 3.0 * sign_y * jitter).max(0.0).min(brief.envelope_h - room.h);
                room.w = (room.w + idx * 4.0 * sign_w).max(1.0).min(brief.envelope_w - room.x);
                room.h = (room.h + idx * 4.0 * sign_h).max(1.0).min(brief.envelope_h - room.y);
            }
            variant
        })
        .collect()
}

/// Count of habitable rooms with no window opening, used as the daylight
/// penalty term in candidate scoring.
fn daylight_penalty(layout: &LayoutResult, brief: &Brief) -> f64 {
    let building = from_brief_and_layout(brief, layout, 0);
    let mut building = building;
    apply_openings(&mut building);
    building
        .floors
        .iter()
        .flat_map(|f| f.spaces.iter())
        .filter(|s| crate::brief::is_habitable(&s.name))
        .filter(|s| !s.openings.iter().any(|o| o.opening_type == crate::scene::OpeningType::Window))
        .count() as f64
}

/// Score a single candidate: higher is better.
pub fn score(brief: &Brief, layout: &LayoutResult) -> f64 {
    let cost = evaluate_cost(brief, layout);
    let total = cost.total(brief);
    let penalty = daylight_penalty(layout, brief);
    -(total + DAYLIGHT_PENALTY_WEIGHT * penalty)
}

/// From a pool of candidate layouts, drop any with error-severity rule
/// violations (reverting to the unfiltered pool if that would empty it),
/// then return the highest-scoring survivor. Candidates are scored
/// concurrently via rayon since each candidate's score depends only on
/// `(brief, candidate)`.
pub fn select_best(brief: &Brief, candidates: Vec<LayoutResult>) -> Option<LayoutResult> {
    if candidates.is_empty() {
        return None;
    }

    let rules = default_rules();
    let passing: Vec<LayoutResult> = candidates
        .iter()
        .filter(|layout| {
            let building = from_brief_and_layout(brief, layout, 0);
            !check(&rules, brief, layout, &building).has_errors()
        })
        .cloned()
        .collect();

    let pool = if passing.is_empty() { candidates } else { passing };

    pool.into_par_iter()
        .map(|layout| {
            let s = score(brief, &layout);
            (s, layout)
        })
        .reduce_with(|a, b| if a.0 >= b.0 { a } else { b })
        .map(|(_, layout)| layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{PlacedRoom, RoomSpec};

    fn brief() -> Brief {
        Brief {
            rooms: vec![RoomSpec { name: "living".into(), target_area: 90_000.0, min_w: 100.0, min_h: 100.0, fixed: false }],
            envelope_w: 1000.0,
            envelope_h: 1000.0,
            hard: Default::default(),
            soft: Default::default(),
            weights: Default::default(),
            adjacency_preferences: vec![],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: Some(3),
            tenant_id: None,
            consent_external: false,
            floors: 1,
        }
    }

    #[test]
    fn variants_stay_within_envelope() {
        let b = brief();
        let base = LayoutResult {
            rooms: vec![PlacedRoom { name: "living".into(), x: 100.0, y: 100.0, w: 300.0, h: 300.0, is_corridor: false }],
            dropped: vec![],
        };
        let variants = propose_variants(&base, &b, VARIANT_COUNT, 11);
        for v in variants {
            let room = v.get("living").unwrap();
            assert!(room.x >= 0.0 && room.x1() <= b.envelope_w + 1e-6);
            assert!(room.y >= 0.0 && room.y1() <= b.envelope_h + 1e-6);
        }
    }

    #[test]
    fn select_best_picks_a_candidate() {
        let b = brief();
        let c1 = LayoutResult {
            rooms: vec![PlacedRoom { name: "living".into(), x: 0.0, y: 0.0, w: 300.0, h: 300.0, is_corridor: false }],
            dropped: vec![],
        };
        let c2 = c1.clone();
        assert!(select_best(&b, vec![c1, c2]).is_some());
    }
}
