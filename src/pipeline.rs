//! Orchestration — runs S1–S12 in sequence and assembles the externally
//! facing `LayoutResponse`. Grounded on `orchestrator.py`/`solver.py` in
//! the retrieval pack's prototype for stage ordering, and on
//! `procedural-core`'s `GenerationService` for the "service wraps free
//! functions" layering.

use serde::{Deserialize, Serialize};

use crate::brief::{Brief, LayoutResult};
use crate::cost::{evaluate_cost, CostBreakdown};
use crate::critic::{propose_variants, select_best};
use crate::errors::BriefError;
use crate::governance::GovernanceReport;
use crate::logging::TimingSpan;
use crate::metrics::{compute_metrics, MetricsReport};
use crate::pack::corridor::pack_with_corridor;
use crate::pack::{choose_hub, pack_with_hub};
use crate::refine::refine_layout;
use crate::repair::repair;
use crate::retrieval::retrieve_seed;
use crate::rules::{check, default_rules, early_prune, ValidationReport};
use crate::scene::openings::apply_openings;
use crate::scene::stairs::ensure_stairs;
use crate::scene::{from_brief_and_layout, Building};
use crate::topology::default_topology_candidates;

/// The complete externally-facing result of generating a layout for one
/// brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub layout: LayoutResult,
    pub building: Building,
    pub validation: ValidationReport,
    pub cost: CostBreakdown,
    pub total_cost: f64,
    pub metrics: MetricsReport,
    pub governance: GovernanceReport,
}

/// The pipeline facade: owns nothing but a rule catalog (loaded once,
/// reused across runs) and exposes `generate`.
pub struct Pipeline {
    rules: Vec<crate::rules::Rule>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self { rules: default_rules() }
    }
}

impl Pipeline {
    pub fn with_rules(rules: Vec<crate::rules::Rule>) -> Self {
        Self { rules }
    }

    /// Run the full S1–S12 chain for `raw_brief`, returning the assembled
    /// response or the brief-normalization error that stopped it.
    pub fn generate(&self, raw_brief: Brief) -> Result<LayoutResponse, BriefError> {
        let _span = TimingSpan::new("pipeline.generate");

        let mut brief = raw_brief;
        early_prune(&mut brief);
        let brief = brief.normalize()?;

        let seed = brief.seed.unwrap_or(0);

        let topo_candidates = default_topology_candidates(&brief);

        let base_layout = self.solve(&brief, seed);

        let refined = if !base_layout.rooms.is_empty() {
            let (refined, outcome) = refine_layout(&base_layout, &brief, seed);
            if outcome.accepts_result() {
                refined
            } else {
                base_layout.clone()
            }
        } else {
            base_layout.clone()
        };

        let mut candidates = topo_candidates;
        candidates.push(refined.clone());
        candidates.extend(propose_variants(&refined, &brief, crate::constants::VARIANT_COUNT, seed));

        // Every candidate must satisfy the same hard-postcondition repair
        // pass before it's eligible for scoring.
        for candidate in candidates.iter_mut() {
            repair(candidate, &brief);
        }

        let chosen = select_best(&brief, candidates).unwrap_or(refined);

        let building = self.lift_and_enrich(&brief, &chosen);

        let validation = check(&self.rules, &brief, &chosen, &building);
        let cost = evaluate_cost(&brief, &chosen);
        let total_cost = cost.total(&brief);
        let metrics = compute_metrics(&brief, &chosen, &building, &validation);
        let governance = GovernanceReport::new(
            brief.seed,
            brief.tenant_id.clone(),
            brief.consent_external,
            &self.rules,
        );

        Ok(LayoutResponse {
            layout: chosen,
            building,
            validation,
            cost,
            total_cost,
            metrics,
            governance,
        })
    }

    /// Choose between hub-first and corridor packing depending on whether
    /// the brief's private-room count warrants a corridor, then repair the
    /// result into a hard-postcondition-satisfying base layout. Persistent
    /// overlap after repair is a hard-postcondition breach (§7); repack
    /// from the plain heuristic packer and repair again, bounded to one
    /// retry, rather than ever return an overlapping layout.
    fn solve(&self, brief: &Brief, _seed: u64) -> LayoutResult {
        let mut layout = self.pack(brief);
        repair(&mut layout, brief);

        if layout.has_overlap() {
            tracing::warn!("geometric repair left residual overlap, retrying from heuristic pack");
            let mut retried = crate::pack::pack_next_fit(brief);
            repair(&mut retried, brief);
            if !retried.has_overlap() {
                layout = retried;
            }
        }

        layout
    }

    fn pack(&self, brief: &Brief) -> LayoutResult {
        if brief.wants_corridor() {
            pack_with_corridor(brief)
        } else if choose_hub(brief).is_some() {
            pack_with_hub(brief)
        } else {
            crate::pack::pack_next_fit(brief)
        }
    }

    /// Lift the solved layout into a scene, replicating it independently
    /// across every floor at elevations `i * 3000`mm (§1, §4.9) before
    /// running the opening and stair enrichers over the whole building.
    fn lift_and_enrich(&self, brief: &Brief, layout: &LayoutResult) -> Building {
        let mut building = from_brief_and_layout(brief, layout, 0);
        for floor_index in 1..brief.floors.max(1) {
            let mut extra = from_brief_and_layout(brief, layout, floor_index);
            building.floors.append(&mut extra.floors);
        }
        apply_openings(&mut building);
        ensure_stairs(&mut building);
        building
    }
}

/// Retrieval-seeded variant of `generate`, for callers that want the
/// nearest curated template as a starting point instead of pure packing.
/// Falls back to `generate` when retrieval has no match (empty brief).
pub fn generate_with_retrieval(pipeline: &Pipeline, raw_brief: Brief) -> Result<LayoutResponse, BriefError> {
    let brief = {
        let mut b = raw_brief.clone();
        early_prune(&mut b);
        b.normalize()?
    };

    if let Some(seed_layout) = retrieve_seed(&brief) {
        let mut layout = seed_layout;
        repair(&mut layout, &brief);
        let building = pipeline.lift_and_enrich(&brief, &layout);
        let validation = check(&pipeline.rules, &brief, &layout, &building);
        let cost = evaluate_cost(&brief, &layout);
        let total_cost = cost.total(&brief);
        let metrics = compute_metrics(&brief, &layout, &building, &validation);
        let governance = GovernanceReport::new(brief.seed, brief.tenant_id.clone(), brief.consent_external, &pipeline.rules);
        Ok(LayoutResponse { layout, building, validation, cost, total_cost, metrics, governance })
    } else {
        pipeline.generate(raw_brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::RoomSpec;

    fn room(name: &str, area: f64) -> RoomSpec {
        RoomSpec { name: name.to_string(), target_area: area, min_w: 150.0, min_h: 150.0, fixed: false }
    }

    fn sample_brief() -> Brief {
        Brief {
            rooms: vec![
                room("living", 240_000.0),
                room("kitchen", 120_000.0),
                room("bed1", 90_000.0),
                room("bed2", 90_000.0),
                room("bath1", 40_000.0),
            ],
            envelope_w: 2000.0,
            envelope_h: 1200.0,
            hard: Default::default(),
            soft: Default::default(),
            weights: Default::default(),
            adjacency_preferences: vec![("living".into(), "kitchen".into())],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: Some(42),
            tenant_id: Some("tenant-a".into()),
            consent_external: false,
            floors: 1,
        }
    }

    #[test]
    fn generate_produces_non_overlapping_layout() {
        let pipeline = Pipeline::default();
        let response = pipeline.generate(sample_brief()).unwrap();
        assert!(!response.layout.has_overlap());
        assert!(!response.governance.run_id.is_empty());
    }

    #[test]
    fn generate_is_deterministic_for_same_seed() {
        let pipeline = Pipeline::default();
        let a = pipeline.generate(sample_brief()).unwrap();
        let b = pipeline.generate(sample_brief()).unwrap();
        assert_eq!(a.layout.rooms, b.layout.rooms);
    }

    #[test]
    fn multi_floor_brief_replicates_the_layout_per_floor() {
        let mut brief = sample_brief();
        brief.floors = 3;
        let pipeline = Pipeline::default();
        let response = pipeline.generate(brief).unwrap();

        assert_eq!(response.building.floors.len(), 3);
        for (i, floor) in response.building.floors.iter().enumerate() {
            assert_eq!(floor.elevation, i as f64 * crate::constants::FLOOR_HEIGHT_MM);
            assert_eq!(floor.spaces.len(), response.layout.rooms.len());
        }
    }
}
