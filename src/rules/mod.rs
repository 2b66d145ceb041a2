//! S9 — Rule validator.
//!
//! A declarative catalog of rules, each tagged by kind rather than
//! dispatched by string (per design notes on replacing the prototype's
//! runtime-flexible dict dispatch with a typed enum), evaluated against a
//! brief + layout + scene to produce a `ValidationReport`. Grounded on
//! `engine.py`/`dsl.py`/`catalog.py` in the retrieval pack's rules
//! prototype.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::brief::{is_bedroom, is_habitable, is_private_room, Brief, LayoutResult};
use crate::constants::{DEFAULT_MIN_BEDROOM_AREA_MM2, DEFAULT_MIN_CORRIDOR_WIDTH_MM};
use crate::graph::AdjacencyGraph;
use crate::scene::{Building, OpeningType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single rule's tagged behavior. Replaces a string-keyed dispatch table
/// with an enum the compiler can exhaustively match on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleKind {
    MinCorridorWidth { min_width: f64 },
    BedroomEgressWindow,
    HabitableDaylightWindow,
    MinRoomArea { selector: RoomSelector, min_area: f64 },
    ConnectedRooms,
    PrivateRoomsToCorridor { min_overlap: u32 },
    CorridorTouchesLiving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomSelector {
    Bedroom,
    Habitable,
    All,
}

impl RoomSelector {
    fn matches(&self, name: &str) -> bool {
        match self {
            RoomSelector::Bedroom => is_bedroom(name),
            RoomSelector::Habitable => is_habitable(name),
            RoomSelector::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub kind: RuleKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub location: String,
    pub suggestion: String,
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} @ {} — {}",
            self.severity, self.id, self.title, self.location, self.suggestion
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<RuleViolation>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == Severity::Error)
    }

    pub fn as_strings(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

/// The four rules shipped by the retrieval pack's prototype, carried
/// forward as defaults.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "corridor.min.width".to_string(),
            title: "Corridor must meet minimum width".to_string(),
            severity: Severity::Error,
            kind: RuleKind::MinCorridorWidth { min_width: DEFAULT_MIN_CORRIDOR_WIDTH_MM },
        },
        Rule {
            id: "bedroom.window.egress".to_string(),
            title: "Bedroom requires an egress window".to_string(),
            severity: Severity::Error,
            kind: RuleKind::BedroomEgressWindow,
        },
        Rule {
            id: "habitable.daylight.window".to_string(),
            title: "Habitable room should have a daylight window".to_string(),
            severity: Severity::Warn,
            kind: RuleKind::HabitableDaylightWindow,
        },
        Rule {
            id: "bedroom.min.area".to_string(),
            title: "Bedroom must meet minimum area".to_string(),
            severity: Severity::Error,
            kind: RuleKind::MinRoomArea { selector: RoomSelector::Bedroom, min_area: DEFAULT_MIN_BEDROOM_AREA_MM2 },
        },
        Rule {
            id: "rooms.connected".to_string(),
            title: "Every room must be reachable from the rest of the floor".to_string(),
            severity: Severity::Error,
            kind: RuleKind::ConnectedRooms,
        },
        Rule {
            id: "private.rooms.corridor".to_string(),
            title: "Private rooms should be reachable via the corridor".to_string(),
            severity: Severity::Warn,
            kind: RuleKind::PrivateRoomsToCorridor { min_overlap: 50 },
        },
        Rule {
            id: "corridor.touches.living".to_string(),
            title: "Corridor should touch the living room".to_string(),
            severity: Severity::Warn,
            kind: RuleKind::CorridorTouchesLiving,
        },
    ]
}

/// Load a rule catalog from a list of JSON file paths, falling back to
/// `default_rules()` whenever none of the paths parse. Each unreadable or
/// malformed path is logged and skipped, rather than aborting the load —
/// matching the prototype loader's skip-on-error behavior.
pub fn load_rules(paths: &[impl AsRef<Path>]) -> Vec<Rule> {
    let mut rules = Vec::new();
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<Rule>>(&contents) {
                Ok(mut parsed) => rules.append(&mut parsed),
                Err(err) => {
                    tracing::warn!(path = %path.as_ref().display(), error = %err, "skipping malformed rule file");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), error = %err, "skipping unreadable rule file");
            }
        }
    }
    if rules.is_empty() {
        default_rules()
    } else {
        rules
    }
}

/// Clamp degenerate room dimensions before any other stage sees the brief.
/// Mirrors `RulesEngine.early_prune`.
pub fn early_prune(brief: &mut Brief) {
    for room in brief.rooms.iter_mut() {
        room.min_w = room.min_w.max(1.0);
        room.min_h = room.min_h.max(1.0);
    }
}

/// Evaluate every rule in `rules` against `brief`/`layout`/`building`,
/// plus the structural checks that apply regardless of catalog content
/// (non-positive dimensions, dropped rooms, hard area bounds).
pub fn check(rules: &[Rule], brief: &Brief, layout: &LayoutResult, building: &Building) -> ValidationReport {
    let mut violations = Vec::new();

    for room in &layout.rooms {
        if room.w <= 0.0 || room.h <= 0.0 {
            violations.push(RuleViolation {
                id: "geometry.nonpositive".to_string(),
                title: "Room has non-positive dimensions".to_string(),
                severity: Severity::Error,
                location: room.name.clone(),
                suggestion: "increase minimum width/height".to_string(),
            });
        }
    }

    for name in &layout.dropped {
        violations.push(RuleViolation {
            id: "placement.dropped".to_string(),
            title: "Room could not be placed within the envelope".to_string(),
            severity: Severity::Error,
            location: name.clone(),
            suggestion: "enlarge the envelope or shrink the room".to_string(),
        });
    }

    for bound in &brief.hard.area_bounds {
        if let Some(room) = layout.get(&bound.room) {
            let area = room.area();
            if area < bound.min_area || area > bound.max_area {
                violations.push(RuleViolation {
                    id: "hard.area.bounds".to_string(),
                    title: "Room area outside allowed bounds".to_string(),
                    severity: Severity::Error,
                    location: bound.room.clone(),
                    suggestion: format!("target an area between {} and {}", bound.min_area, bound.max_area),
                });
            }
        }
    }

    let graph = AdjacencyGraph::build(layout);

    for rule in rules {
        evaluate_rule(rule, brief, layout, building, &graph, &mut violations);
    }

    ValidationReport { violations }
}

fn evaluate_rule(
    rule: &Rule,
    _brief: &Brief,
    layout: &LayoutResult,
    building: &Building,
    graph: &AdjacencyGraph,
    violations: &mut Vec<RuleViolation>,
) {
    match &rule.kind {
        RuleKind::MinCorridorWidth { min_width } => {
            if let Some(corridor) = layout.corridor() {
                if corridor.w.min(corridor.h) < *min_width {
                    violations.push(violation(rule, corridor.name.clone(), format!("widen corridor to at least {min_width}mm")));
                }
            }
        }
        RuleKind::BedroomEgressWindow => {
            for floor in &building.floors {
                for space in &floor.spaces {
                    if is_bedroom(&space.name)
                        && !space.openings.iter().any(|o| o.opening_type == OpeningType::Window)
                    {
                        violations.push(violation(rule, space.name.clone(), "add an egress window".to_string()));
                    }
                }
            }
        }
        RuleKind::HabitableDaylightWindow => {
            for floor in &building.floors {
                for space in &floor.spaces {
                    if is_habitable(&space.name)
                        && !space.openings.iter().any(|o| o.opening_type == OpeningType::Window)
                    {
                        violations.push(violation(rule, space.name.clone(), "add a daylight window".to_string()));
                    }
                }
            }
        }
        RuleKind::MinRoomArea { selector, min_area } => {
            for room in &layout.rooms {
                if selector.matches(&room.name) && room.area() < *min_area {
                    violations.push(violation(rule, room.name.clone(), format!("increase area to at least {min_area}mm^2")));
                }
            }
        }
        RuleKind::ConnectedRooms => {
            for room in &layout.rooms {
                if graph.is_isolated(&room.name) {
                    violations.push(violation(rule, room.name.clone(), "connect this room to the rest of the floor".to_string()));
                }
            }
        }
        RuleKind::PrivateRoomsToCorridor { min_overlap } => {
            let Some(corridor) = layout.corridor() else { return };
            for room in &layout.rooms {
                if is_private_room(&room.name) && room.shared_edge_length(corridor) < *min_overlap as f64 {
                    violations.push(violation(rule, room.name.clone(), "move closer to the corridor".to_string()));
                }
            }
        }
        RuleKind::CorridorTouchesLiving => {
            let Some(corridor) = layout.corridor() else { return };
            let living = layout.rooms.iter().find(|r| r.name.to_lowercase().starts_with("living"));
            if let Some(living) = living {
                if corridor.shared_edge_length(living) <= 0.0 {
                    violations.push(violation(rule, corridor.name.clone(), "route the corridor to touch the living room".to_string()));
                }
            }
        }
    }
}

fn violation(rule: &Rule, location: String, suggestion: String) -> RuleViolation {
    RuleViolation {
        id: rule.id.clone(),
        title: rule.title.clone(),
        severity: rule.severity,
        location,
        suggestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{PlacedRoom, RoomSpec};

    fn empty_building() -> Building {
        Building { unit_system: "mm".into(), rounding: 1.0, width: 1.0, height: 1.0, floors: vec![] }
    }

    #[test]
    fn dropped_room_produces_error_violation() {
        let brief = Brief {
            rooms: vec![RoomSpec { name: "bed1".into(), target_area: 1.0, min_w: 1.0, min_h: 1.0, fixed: false }],
            envelope_w: 10.0,
            envelope_h: 10.0,
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
        let layout = LayoutResult { rooms: vec![], dropped: vec!["bed1".to_string()] };
        let report = check(&default_rules(), &brief, &layout, &empty_building());
        assert!(report.has_errors());
        assert!(report.as_strings()[0].starts_with("[error]"));
    }

    #[test]
    fn isolated_room_violates_connected_rooms_rule() {
        let brief = Brief {
            rooms: vec![],
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
            rooms: vec![
                PlacedRoom { name: "a".into(), x: 0.0, y: 0.0, w: 100.0, h: 100.0, is_corridor: false },
                PlacedRoom { name: "b".into(), x: 900.0, y: 900.0, w: 100.0, h: 100.0, is_corridor: false },
            ],
            dropped: vec![],
        };
        let report = check(&default_rules(), &brief, &layout, &empty_building());
        assert!(report.violations.iter().any(|v| v.id == "rooms.connected"));
    }

    #[test]
    fn load_rules_reads_a_catalog_file_and_falls_back_on_bad_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id":"custom.rule","title":"Custom","severity":"Warn","kind":"ConnectedRooms"}]"#,
        )
        .unwrap();

        let rules = load_rules(&[&path]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id, "custom.rule");

        let missing = dir.path().join("does-not-exist.json");
        let fallback = load_rules(&[&missing]);
        assert_eq!(fallback.len(), default_rules().len());
    }
}
