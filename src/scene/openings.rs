//! S12 — Openings finalizer.
//!
//! Adds perimeter windows to every non-bath room and doors between the
//! corridor and whatever it touches (or between living and kitchen when no
//! corridor exists). Sizes come from the fixed constants
//! `DOOR_W_MM`/`DOOR_H_MM`/`WINDOW_W_MM`/`WINDOW_H_MM`, which differ from
//! the retrieval pack's own prototype sizes; the
//! door-on-either-side-of-the-corridor generalization is carried from that
//! prototype, which is silent on directionality.

use crate::brief::is_bath;
use crate::constants::{DOOR_H_MM, DOOR_W_MM, WINDOW_H_MM, WINDOW_W_MM};
use crate::scene::{Building, Opening, OpeningType, Point};

const EDGE_TOLERANCE: f64 = 1.0;

/// Apply perimeter windows and corridor/living-kitchen doors to every space
/// on every floor of `building`, in place.
pub fn apply_openings(building: &mut Building) {
    for floor in building.floors.iter_mut() {
        let rects: Vec<(String, bool, f64, f64, f64, f64)> = floor
            .spaces
            .iter()
            .map(|s| {
                let is_corridor = s.name.to_lowercase().starts_with("corridor");
                (s.name.clone(), is_corridor, s.rect.x, s.rect.y, s.rect.x + s.rect.w, s.rect.y + s.rect.h)
            })
            .collect();

        for i in 0..floor.spaces.len() {
            let (name, _, x0, y0, x1, y1) = rects[i].clone();

            if !is_bath(&name) && on_perimeter(x0, y0, x1, y1, building.width, building.height) {
                let mid_y = (y0 + y1) / 2.0;
                floor.spaces[i].openings.push(Opening {
                    id: uuid::Uuid::new_v4(),
                    opening_type: OpeningType::Window,
                    at: Point { x: x0, y: mid_y },
                    w: WINDOW_W_MM,
                    h: WINDOW_H_MM,
                });
            }
        }

        for i in 0..floor.spaces.len() {
            for j in 0..floor.spaces.len() {
                if i == j {
                    continue;
                }
                let (name_i, corridor_i, ix0, iy0, ix1, iy1) = rects[i].clone();
                let (name_j, corridor_j, jx0, jy0, jx1, jy1) = rects[j].clone();

                let wants_door = (corridor_i && !corridor_j)
                    || (name_i.to_lowercase().starts_with("living") && name_j.to_lowercase().starts_with("kitchen"));
                if !wants_door {
                    continue;
                }
                if !shares_horizontal_edge(iy0, iy1, jy0, jy1, ix0, ix1, jx0, jx1) {
                    continue;
                }

                let mid_x = (ix0.max(jx0) + ix1.min(jx1)) / 2.0;
                let door_y = if (iy1 - jy0).abs() < EDGE_TOLERANCE { iy1 } else { iy0 };
                floor.spaces[i].openings.push(Opening {
                    id: uuid::Uuid::new_v4(),
                    opening_type: OpeningType::Door,
                    at: Point { x: mid_x, y: door_y },
                    w: DOOR_W_MM,
                    h: DOOR_H_MM,
                });
            }
        }
    }
}

fn on_perimeter(x0: f64, y0: f64, x1: f64, y1: f64, width: f64, height: f64) -> bool {
    x0 <= EDGE_TOLERANCE
        || y0 <= EDGE_TOLERANCE
        || (width - x1).abs() <= EDGE_TOLERANCE
        || (height - y1).abs() <= EDGE_TOLERANCE
}

fn shares_horizontal_edge(
    iy0: f64,
    iy1: f64,
    jy0: f64,
    jy1: f64,
    ix0: f64,
    ix1: f64,
    jx0: f64,
    jx1: f64,
) -> bool {
    let y_touch = (iy1 - jy0).abs() < EDGE_TOLERANCE || (iy0 - jy1).abs() < EDGE_TOLERANCE;
    let x_overlap = ix0.max(jx0) < ix1.min(jx1);
    y_touch && x_overlap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Floor, Space, Rect};
    use uuid::Uuid;

    fn space(name: &str, x: f64, y: f64, w: f64, h: f64) -> Space {
        Space {
            id: Uuid::new_v4(),
            name: name.to_string(),
            rect: Rect { x, y, w, h },
            boundaries: vec![],
            openings: vec![],
            fixtures: vec![],
        }
    }

    #[test]
    fn perimeter_habitable_room_gets_window() {
        let mut building = Building {
            unit_system: "mm".into(),
            rounding: 1.0,
            width: 1000.0,
            height: 1000.0,
            floors: vec![Floor { elevation: 0.0, spaces: vec![space("living", 0.0, 0.0, 400.0, 300.0)] }],
        };
        apply_openings(&mut building);
        assert!(!building.floors[0].spaces[0].openings.is_empty());
    }

    #[test]
    fn corridor_adjacent_room_gets_door() {
        let mut building = Building {
            unit_system: "mm".into(),
            rounding: 1.0,
            width: 1000.0,
            height: 1000.0,
            floors: vec![Floor {
                elevation: 0.0,
                spaces: vec![space("corridor", 0.0, 400.0, 1000.0, 100.0), space("bed1", 0.0, 500.0, 300.0, 300.0)],
            }],
        };
        apply_openings(&mut building);
        let bed = &building.floors[0].spaces[1];
        assert!(bed.openings.iter().any(|o| matches!(o.opening_type, OpeningType::Door)));
    }
}
