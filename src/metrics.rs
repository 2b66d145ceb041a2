//! Quality-assurance metrics computed over the final layout, scene, and
//! validation report. Grounded on `metrics.py` in the retrieval pack's QA
//! prototype. `struct_alignment_score`/`mep_alignment_score` are stubbed
//! to a neutral value since structural/MEP analysis is an out-of-scope
//! external collaborator, not something this crate computes.

use serde::{Deserialize, Serialize};

use crate::brief::{Brief, LayoutResult};
use crate::constants::VIOLATIONS_NORMALIZATION_MM2;
use crate::rules::ValidationReport;
use crate::scene::Building;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub program_satisfaction_pct: f64,
    pub corridor_ratio: f64,
    pub compliance_pass: bool,
    pub violations_per_100m2: f64,
    pub struct_alignment_score: f64,
    pub mep_alignment_score: f64,
}

fn program_satisfaction(brief: &Brief, layout: &LayoutResult) -> f64 {
    if brief.rooms.is_empty() {
        return 100.0;
    }
    let placed = brief
        .rooms
        .iter()
        .filter(|r| layout.get(&r.name).is_some())
        .count();
    (placed as f64 / brief.rooms.len() as f64) * 100.0
}

fn corridor_ratio(building: &Building) -> f64 {
    let Some(floor) = building.floors.first() else {
        return 0.0;
    };
    let total: f64 = floor.spaces.iter().map(|s| s.rect.w * s.rect.h).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let corridor: f64 = floor
        .spaces
        .iter()
        .filter(|s| s.name.to_lowercase().starts_with("corridor"))
        .map(|s| s.rect.w * s.rect.h)
        .sum();
    corridor / total
}

fn compliance_pass(report: &ValidationReport) -> bool {
    !report.as_strings().iter().any(|v| v.starts_with("[error]"))
}

fn violations_per_100m2(report: &ValidationReport, building: &Building) -> f64 {
    let area: f64 = building
        .floors
        .iter()
        .flat_map(|f| f.spaces.iter())
        .map(|s| s.rect.w * s.rect.h)
        .sum();
    if area <= 0.0 {
        return 0.0;
    }
    report.violations.len() as f64 / (area / VIOLATIONS_NORMALIZATION_MM2)
}

/// Compute the full metrics report for a finished layout.
pub fn compute_metrics(
    brief: &Brief,
    layout: &LayoutResult,
    building: &Building,
    report: &ValidationReport,
) -> MetricsReport {
    MetricsReport {
        program_satisfaction_pct: program_satisfaction(brief, layout),
        corridor_ratio: corridor_ratio(building),
        compliance_pass: compliance_pass(report),
        violations_per_100m2: violations_per_100m2(report, building),
        struct_alignment_score: 0.0,
        mep_alignment_score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{PlacedRoom, RoomSpec};
    use crate::scene::from_brief_and_layout;

    #[test]
    fn fully_placed_layout_has_full_satisfaction() {
        let brief = Brief {
            rooms: vec![RoomSpec { name: "living".into(), target_area: 1.0, min_w: 1.0, min_h: 1.0, fixed: false }],
            envelope_w: 1000.0,
            envelope_h: 1000.0,
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
        let layout = LayoutResult {
            rooms: vec![PlacedRoom { name: "living".into(), x: 0.0, y: 0.0, w: 400.0, h: 300.0, is_corridor: false }],
            dropped: vec![],
        };
        let building = from_brief_and_layout(&brief, &layout, 0);
        let report = ValidationReport::default();
        let metrics = compute_metrics(&brief, &layout, &building, &report);
        assert_eq!(metrics.program_satisfaction_pct, 100.0);
        assert!(metrics.compliance_pass);
    }
}
