//! S8 — Scene lifter.
//!
//! Lifts a flat `LayoutResult` into the externally-facing scene model:
//! rooms become `Space`s with wall `Boundary` segments, ready for the
//! enrichment passes (`openings`, `stairs`) to add doors, windows, and
//! fixtures. Grounded on `scene.py` in the retrieval pack's model
//! prototype.

pub mod openings;
pub mod stairs;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brief::{Brief, LayoutResult, PlacedRoom};
use crate::constants::{FLOOR_HEIGHT_MM, WALL_THICKNESS_MM};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn bbox(&self) -> (Point, Point) {
        (
            Point { x: self.x, y: self.y },
            Point {
                x: self.x + self.w,
                y: self.y + self.h,
            },
        )
    }

    pub fn from_placed(room: &PlacedRoom) -> Self {
        Self {
            x: room.x,
            y: room.y,
            w: room.w,
            h: room.h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningType {
    Door,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureType {
    Toilet,
    Sink,
    Shower,
    Tub,
    Range,
    Fridge,
    Stairs,
    Ramp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: Uuid,
    pub a: Point,
    pub b: Point,
    #[serde(default = "default_wall_thickness")]
    pub thickness: f64,
}

fn default_wall_thickness() -> f64 {
    WALL_THICKNESS_MM
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: Uuid,
    pub opening_type: OpeningType,
    pub at: Point,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: Uuid,
    pub fixture_type: FixtureType,
    pub at: Point,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub meta: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    pub rect: Rect,
    pub boundaries: Vec<Boundary>,
    pub openings: Vec<Opening>,
    pub fixtures: Vec<Fixture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub elevation: f64,
    pub spaces: Vec<Space>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub unit_system: String,
    pub rounding: f64,
    pub width: f64,
    pub height: f64,
    pub floors: Vec<Floor>,
}

/// Build the four wall-boundary segments for a rectangular room.
fn boundaries_for(rect: &Rect) -> Vec<Boundary> {
    let (top_left, bottom_right) = rect.bbox();
    let top_right = Point { x: bottom_right.x, y: top_left.y };
    let bottom_left = Point { x: top_left.x, y: bottom_right.y };

    vec![
        Boundary { id: Uuid::new_v4(), a: top_left, b: top_right, thickness: WALL_THICKNESS_MM },
        Boundary { id: Uuid::new_v4(), a: top_right, b: bottom_right, thickness: WALL_THICKNESS_MM },
        Boundary { id: Uuid::new_v4(), a: bottom_right, b: bottom_left, thickness: WALL_THICKNESS_MM },
        Boundary { id: Uuid::new_v4(), a: bottom_left, b: top_left, thickness: WALL_THICKNESS_MM },
    ]
}

/// Lift a brief + layout into a single-floor `Building`. Multi-floor
/// buildings are assembled by the pipeline stacking several of these, each
/// at `i * FLOOR_HEIGHT_MM` elevation.
pub fn from_brief_and_layout(brief: &Brief, layout: &LayoutResult, floor_index: usize) -> Building {
    let spaces = layout
        .rooms
        .iter()
        .map(|room| {
            let rect = Rect::from_placed(room);
            Space {
                id: Uuid::new_v4(),
                name: room.name.clone(),
                rect,
                boundaries: boundaries_for(&rect),
                openings: vec![],
                fixtures: vec![],
            }
        })
        .collect();

    Building {
        unit_system: "mm".to_string(),
        rounding: 1.0,
        width: brief.envelope_w,
        height: brief.envelope_h,
        floors: vec![Floor {
            elevation: floor_index as f64 * FLOOR_HEIGHT_MM,
            spaces,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::RoomSpec;

    #[test]
    fn lifts_one_space_per_room() {
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
        assert_eq!(building.floors.len(), 1);
        assert_eq!(building.floors[0].spaces.len(), 1);
        assert_eq!(building.floors[0].spaces[0].boundaries.len(), 4);
    }
}
