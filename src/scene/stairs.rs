//! S12 — Stair placement.
//!
//! Adds one stair fixture per multi-floor building, centered on the
//! envelope footprint and attached to whichever space contains that
//! center (or the first space, if none does). Grounded on `ensure_stairs`
//! in the retrieval pack's geometry prototype.

use std::collections::BTreeMap;

use crate::constants::{STAIR_H_MM, STAIR_W_MM};
use crate::scene::{Building, Fixture, FixtureType, Point};

/// Place a stair fixture on every floor, only if the building has more
/// than one floor.
pub fn ensure_stairs(building: &mut Building) {
    if building.floors.len() <= 1 {
        return;
    }

    let center = Point {
        x: building.width / 2.0,
        y: building.height / 2.0,
    };

    for floor in building.floors.iter_mut() {
        let target = floor
            .spaces
            .iter()
            .position(|s| {
                center.x >= s.rect.x
                    && center.x <= s.rect.x + s.rect.w
                    && center.y >= s.rect.y
                    && center.y <= s.rect.y + s.rect.h
            })
            .unwrap_or(0);

        let Some(space) = floor.spaces.get_mut(target) else {
            continue;
        };

        let mut meta = BTreeMap::new();
        meta.insert("rise".to_string(), "170".to_string());
        meta.insert("run".to_string(), "280".to_string());

        space.fixtures.push(Fixture {
            id: uuid::Uuid::new_v4(),
            fixture_type: FixtureType::Stairs,
            at: center,
            w: STAIR_W_MM,
            h: STAIR_H_MM,
            meta,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Floor, Rect, Space};
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
    fn single_floor_building_gets_no_stairs() {
        let mut building = Building {
            unit_system: "mm".into(),
            rounding: 1.0,
            width: 1000.0,
            height: 1000.0,
            floors: vec![Floor { elevation: 0.0, spaces: vec![space("living", 0.0, 0.0, 1000.0, 1000.0)] }],
        };
        ensure_stairs(&mut building);
        assert!(building.floors[0].spaces[0].fixtures.is_empty());
    }

    #[test]
    fn multi_floor_building_gets_stairs_per_floor() {
        let floor = Floor { elevation: 0.0, spaces: vec![space("living", 0.0, 0.0, 1000.0, 1000.0)] };
        let mut building = Building {
            unit_system: "mm".into(),
            rounding: 1.0,
            width: 1000.0,
            height: 1000.0,
            floors: vec![floor.clone(), floor],
        };
        ensure_stairs(&mut building);
        for floor in &building.floors {
            assert!(floor.spaces.iter().any(|s| !s.fixtures.is_empty()));
        }
    }
}
