//! S1 — Brief normalizer.
//!
//! Takes a raw program request and fills in defaults, producing a `Brief`
//! that every downstream stage can treat as fully specified.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::{
    DEFAULT_ASPECT_RATIO_TARGET, DEFAULT_ASPECT_RATIO_TOLERANCE, DEFAULT_MIN_OVERLAP,
    DEFAULT_MIN_PRIVATE_FOR_CORRIDOR, DEFAULT_WEIGHT_ADJACENCY_MISSING,
    DEFAULT_WEIGHT_AREA_TARGET_DEVIATION, DEFAULT_WEIGHT_ASPECT_RATIO_DEVIATION,
    DEFAULT_WEIGHT_BEDROOM_PRIVACY, DEFAULT_WEIGHT_HUB_DISTANCE,
};
use crate::errors::BriefError;

/// A single room the program requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub target_area: f64,
    pub min_w: f64,
    pub min_h: f64,
    #[serde(default)]
    pub fixed: bool,
}

/// Per-room area bound used by hard constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAreaConstraint {
    pub room: String,
    pub min_area: f64,
    pub max_area: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HardConstraints {
    #[serde(default)]
    pub area_bounds: Vec<RoomAreaConstraint>,
    #[serde(default)]
    pub min_corridor_width: Option<f64>,
}

/// A preferred (not mandatory) adjacency between two named rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyPreference {
    pub a: String,
    pub b: String,
    #[serde(default = "default_adjacency_weight")]
    pub weight: f64,
}

fn default_adjacency_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftObjectives {
    #[serde(default = "default_aspect_ratio_target")]
    pub aspect_ratio_target: f64,
    #[serde(default = "default_aspect_ratio_tolerance")]
    pub aspect_ratio_tolerance: f64,
    #[serde(default = "default_true")]
    pub enforce_privacy: bool,
}

fn default_aspect_ratio_target() -> f64 {
    DEFAULT_ASPECT_RATIO_TARGET
}
fn default_aspect_ratio_tolerance() -> f64 {
    DEFAULT_ASPECT_RATIO_TOLERANCE
}
fn default_true() -> bool {
    true
}

impl Default for SoftObjectives {
    fn default() -> Self {
        Self {
            aspect_ratio_target: DEFAULT_ASPECT_RATIO_TARGET,
            aspect_ratio_tolerance: DEFAULT_ASPECT_RATIO_TOLERANCE,
            enforce_privacy: true,
        }
    }
}

/// Weights applied to each cost term by the soft-cost evaluator (S10).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftWeights {
    #[serde(default = "w_adjacency")]
    pub adjacency_missing: f64,
    #[serde(default = "w_privacy")]
    pub bedroom_privacy: f64,
    #[serde(default = "w_aspect")]
    pub aspect_ratio_deviation: f64,
    #[serde(default = "w_area")]
    pub area_target_deviation: f64,
    #[serde(default = "w_hub")]
    pub hub_distance: f64,
}

fn w_adjacency() -> f64 {
    DEFAULT_WEIGHT_ADJACENCY_MISSING
}
fn w_privacy() -> f64 {
    DEFAULT_WEIGHT_BEDROOM_PRIVACY
}
fn w_aspect() -> f64 {
    DEFAULT_WEIGHT_ASPECT_RATIO_DEVIATION
}
fn w_area() -> f64 {
    DEFAULT_WEIGHT_AREA_TARGET_DEVIATION
}
fn w_hub() -> f64 {
    DEFAULT_WEIGHT_HUB_DISTANCE
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            adjacency_missing: DEFAULT_WEIGHT_ADJACENCY_MISSING,
            bedroom_privacy: DEFAULT_WEIGHT_BEDROOM_PRIVACY,
            aspect_ratio_deviation: DEFAULT_WEIGHT_ASPECT_RATIO_DEVIATION,
            area_target_deviation: DEFAULT_WEIGHT_AREA_TARGET_DEVIATION,
            hub_distance: DEFAULT_WEIGHT_HUB_DISTANCE,
        }
    }
}

/// Connectivity policy — when a corridor is warranted and what counts as
/// "touching" it. Absent from the original schema; added per design notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connectivity {
    #[serde(default = "default_min_overlap")]
    pub min_overlap: u32,
    #[serde(default = "default_min_private_for_corridor")]
    pub min_private_for_corridor: usize,
}

fn default_min_overlap() -> u32 {
    DEFAULT_MIN_OVERLAP
}
fn default_min_private_for_corridor() -> usize {
    DEFAULT_MIN_PRIVATE_FOR_CORRIDOR
}

impl Default for Connectivity {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            min_private_for_corridor: DEFAULT_MIN_PRIVATE_FOR_CORRIDOR,
        }
    }
}

/// An interaction-authored constraint pinning a room's position and/or size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRoom {
    pub room: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
}

impl PinRoom {
    pub fn locks_position(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    pub fn locks_size(&self) -> bool {
        self.w.is_some() && self.h.is_some()
    }

    pub fn is_fully_locked(&self) -> bool {
        self.locks_position() && self.locks_size()
    }
}

/// A normalized program request, ready for seeding and packing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    pub rooms: Vec<RoomSpec>,
    pub envelope_w: f64,
    pub envelope_h: f64,
    #[serde(default)]
    pub hard: HardConstraints,
    #[serde(default)]
    pub soft: SoftObjectives,
    #[serde(default)]
    pub weights: SoftWeights,
    #[serde(default)]
    pub adjacency_preferences: Vec<(String, String)>,
    #[serde(default)]
    pub adjacency: Vec<AdjacencyPreference>,
    #[serde(default)]
    pub connectivity: Option<Connectivity>,
    #[serde(default)]
    pub pins: Vec<PinRoom>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub consent_external: bool,
    /// Number of floors to independently replicate the solved layout
    /// across (§1: "floors are independently replicated"). Clamped to
    /// at least 1 during normalization.
    #[serde(default = "default_floors")]
    pub floors: usize,
}

fn default_floors() -> usize {
    1
}

impl Brief {
    /// Normalize a raw brief: clamp degenerate room dimensions, fill in
    /// connectivity defaults, and reject briefs that cannot possibly be
    /// placed. Mirrors `RulesEngine.early_prune` plus schema-default
    /// population.
    pub fn normalize(mut self) -> Result<Self, BriefError> {
        if self.rooms.is_empty() {
            return Err(BriefError::NoRooms);
        }
        if self.envelope_w <= 0.0 || self.envelope_h <= 0.0 {
            return Err(BriefError::InvalidEnvelope {
                w: self.envelope_w,
                h: self.envelope_h,
            });
        }

        let mut seen = HashSet::new();
        for room in &mut self.rooms {
            if room.name.trim().is_empty() || !seen.insert(room.name.clone()) {
                return Err(BriefError::InvalidRoomName {
                    name: room.name.clone(),
                });
            }
            room.min_w = room.min_w.max(1.0);
            room.min_h = room.min_h.max(1.0);
            if room.target_area < room.min_w * room.min_h {
                room.target_area = room.min_w * room.min_h;
            }
        }

        let known: HashSet<&str> = self.rooms.iter().map(|r| r.name.as_str()).collect();
        for c in &self.hard.area_bounds {
            if !known.contains(c.room.as_str()) {
                return Err(BriefError::UnknownRoomReference {
                    name: c.room.clone(),
                });
            }
        }
        for (a, b) in &self.adjacency_preferences {
            if !known.contains(a.as_str()) {
                return Err(BriefError::UnknownRoomReference { name: a.clone() });
            }
            if !known.contains(b.as_str()) {
                return Err(BriefError::UnknownRoomReference { name: b.clone() });
            }
        }

        if self.connectivity.is_none() {
            self.connectivity = Some(Connectivity::default());
        }
        self.floors = self.floors.max(1);

        Ok(self)
    }

    /// All adjacency pairs, combining the legacy tuple list and the
    /// weighted list into one view.
    pub fn all_adjacency_pairs(&self) -> Vec<(String, String, f64)> {
        let mut out: Vec<(String, String, f64)> = self
            .adjacency_preferences
            .iter()
            .map(|(a, b)| (a.clone(), b.clone(), 1.0))
            .collect();
        out.extend(
            self.adjacency
                .iter()
                .map(|p| (p.a.clone(), p.b.clone(), p.weight)),
        );
        out
    }

    pub fn private_room_count(&self) -> usize {
        self.rooms.iter().filter(|r| is_private_room(&r.name)).count()
    }

    pub fn wants_corridor(&self) -> bool {
        let min = self
            .connectivity
            .as_ref()
            .map(|c| c.min_private_for_corridor)
            .unwrap_or(DEFAULT_MIN_PRIVATE_FOR_CORRIDOR);
        self.private_room_count() >= min
    }

    pub fn min_overlap(&self) -> u32 {
        self.connectivity
            .as_ref()
            .map(|c| c.min_overlap)
            .unwrap_or(DEFAULT_MIN_OVERLAP)
    }

    pub fn pin_for<'a>(&'a self, room_name: &str) -> Option<&'a PinRoom> {
        self.pins.iter().find(|p| p.room == room_name)
    }
}

/// A room's fully-resolved placement in a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub is_corridor: bool,
}

impl PlacedRoom {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn x1(&self) -> f64 {
        self.x + self.w
    }

    pub fn y1(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.w.abs() < f64::EPSILON || self.h.abs() < f64::EPSILON {
            f64::INFINITY
        } else {
            self.w.max(self.h) / self.w.min(self.h)
        }
    }

    /// Inclusive touch-or-overlap test: shared edge counts as touching.
    pub fn touches_or_overlaps(&self, other: &PlacedRoom) -> bool {
        !(self.x1() < other.x
            || other.x1() < self.x
            || self.y1() < other.y
            || other.y1() < self.y)
    }

    /// Strict overlap test (shared edge alone does not count).
    pub fn overlaps(&self, other: &PlacedRoom) -> bool {
        self.x < other.x1() && other.x < self.x1() && self.y < other.y1() && other.y < self.y1()
    }

    /// Length of the shared edge between two axis-aligned rectangles, 0 if
    /// they don't share one.
    pub fn shared_edge_length(&self, other: &PlacedRoom) -> f64 {
        let vertical_touch =
            (self.x1() - other.x).abs() < 1e-6 || (other.x1() - self.x).abs() < 1e-6;
        let horizontal_touch =
            (self.y1() - other.y).abs() < 1e-6 || (other.y1() - self.y).abs() < 1e-6;

        if vertical_touch {
            let overlap = (self.y1().min(other.y1()) - self.y.max(other.y)).max(0.0);
            return overlap;
        }
        if horizontal_touch {
            let overlap = (self.x1().min(other.x1()) - self.x.max(other.x)).max(0.0);
            return overlap;
        }
        0.0
    }
}

pub fn is_bedroom(name: &str) -> bool {
    let n = name.to_lowercase();
    n.starts_with("bed") || n.contains("bedroom")
}

pub fn is_bath(name: &str) -> bool {
    name.to_lowercase().starts_with("bath")
}

/// A "private room" per the glossary: bedrooms and bathrooms (`bed*`/`bath*`),
/// the set counted toward corridor insertion and corridor-touch checks.
pub fn is_private_room(name: &str) -> bool {
    is_bedroom(name) || is_bath(name)
}

pub fn is_habitable(name: &str) -> bool {
    let n = name.to_lowercase();
    is_bedroom(&n) || n.starts_with("living") || n.starts_with("kitchen") || n.starts_with("office")
}

pub fn is_corridor_name(name: &str) -> bool {
    name.to_lowercase().starts_with("corridor") || name.to_lowercase().starts_with("hall")
}

/// The output of the packer/refiner/repair chain: a complete set of placed
/// rooms plus the rooms that could not be placed at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub rooms: Vec<PlacedRoom>,
    pub dropped: Vec<String>,
}

impl LayoutResult {
    pub fn get(&self, name: &str) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlacedRoom> {
        self.rooms.iter_mut().find(|r| r.name == name)
    }

    pub fn corridor(&self) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.is_corridor)
    }

    pub fn has_overlap(&self) -> bool {
        for i in 0..self.rooms.len() {
            for j in (i + 1)..self.rooms.len() {
                if self.rooms[i].overlaps(&self.rooms[j]) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str, area: f64, w: f64, h: f64) -> RoomSpec {
        RoomSpec {
            name: name.to_string(),
            target_area: area,
            min_w: w,
            min_h: h,
            fixed: false,
        }
    }

    #[test]
    fn normalize_fills_connectivity_defaults() {
        let brief = Brief {
            rooms: vec![room("living", 240_000.0, 400.0, 300.0)],
            envelope_w: 2000.0,
            envelope_h: 1200.0,
            hard: HardConstraints::default(),
            soft: SoftObjectives::default(),
            weights: SoftWeights::default(),
            adjacency_preferences: vec![],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: Some(1),
            tenant_id: None,
            consent_external: false,
            floors: 1,
        }
        .normalize()
        .unwrap();

        assert_eq!(brief.min_overlap(), DEFAULT_MIN_OVERLAP);
    }

    #[test]
    fn normalize_rejects_empty_rooms() {
        let brief = Brief {
            rooms: vec![],
            envelope_w: 1000.0,
            envelope_h: 1000.0,
            hard: HardConstraints::default(),
            soft: SoftObjectives::default(),
            weights: SoftWeights::default(),
            adjacency_preferences: vec![],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: None,
            tenant_id: None,
            consent_external: false,
            floors: 1,
        };
        assert_eq!(brief.normalize().unwrap_err(), BriefError::NoRooms);
    }

    #[test]
    fn normalize_clamps_degenerate_dimensions() {
        let brief = Brief {
            rooms: vec![room("bed1", 1.0, 0.0, -5.0)],
            envelope_w: 1000.0,
            envelope_h: 1000.0,
            hard: HardConstraints::default(),
            soft: SoftObjectives::default(),
            weights: SoftWeights::default(),
            adjacency_preferences: vec![],
            adjacency: vec![],
            connectivity: None,
            pins: vec![],
            seed: None,
            tenant_id: None,
            consent_external: false,
            floors: 1,
        }
        .normalize()
        .unwrap();

        let r = &brief.rooms[0];
        assert!(r.min_w >= 1.0 && r.min_h >= 1.0);
        assert!(r.target_area >= r.min_w * r.min_h);
    }

    #[test]
    fn touches_or_overlaps_is_inclusive_of_shared_edge() {
        let a = PlacedRoom {
            name: "a".into(),
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
            is_corridor: false,
        };
        let b = PlacedRoom {
            name: "b".into(),
            x: 100.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
            is_corridor: false,
        };
        assert!(a.touches_or_overlaps(&b));
        assert!(!a.overlaps(&b));
    }
}
