//! S3 — Retrieval seeder.
//!
//! Matches the brief's room program against a small library of curated
//! floor-plan templates and returns the closest one, clamped to the
//! envelope, grounded on `retrieve_seed` in the retrieval pack's prototype.

use std::collections::{BTreeMap, BTreeSet};

use crate::brief::{Brief, LayoutResult, PlacedRoom};

struct Template {
    name: &'static str,
    rooms: &'static [(&'static str, f64, f64, f64, f64)],
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "2bed_1bath",
        rooms: &[
            ("living", 0.0, 0.0, 500.0, 400.0),
            ("kitchen", 500.0, 0.0, 300.0, 400.0),
            ("bed1", 0.0, 400.0, 300.0, 300.0),
            ("bed2", 300.0, 400.0, 300.0, 300.0),
            ("bath1", 600.0, 400.0, 200.0, 200.0),
        ],
    },
    Template {
        name: "1bed_studio",
        rooms: &[
            ("living", 0.0, 0.0, 400.0, 400.0),
            ("kitchen", 400.0, 0.0, 250.0, 250.0),
            ("bed1", 0.0, 400.0, 350.0, 300.0),
            ("bath1", 350.0, 400.0, 200.0, 200.0),
        ],
    },
];

/// Normalize a room name to a coarse program signature key (bed/bath/
/// living/kitchen prefix), used for template matching.
fn program_signature(rooms: &[crate::brief::RoomSpec]) -> BTreeMap<String, usize> {
    let mut sig: BTreeMap<String, usize> = BTreeMap::new();
    for r in rooms {
        let n = r.name.to_lowercase();
        let key = if n.starts_with("bed") {
            "bed"
        } else if n.starts_with("bath") {
            "bath"
        } else if n.starts_with("living") {
            "living"
        } else if n.starts_with("kitchen") {
            "kitchen"
        } else {
            continue;
        };
        *sig.entry(key.to_string()).or_insert(0) += 1;
    }
    sig
}

fn template_signature(template: &Template) -> BTreeMap<String, usize> {
    let mut sig: BTreeMap<String, usize> = BTreeMap::new();
    for (name, ..) in template.rooms {
        let n = name.to_lowercase();
        let key = if n.starts_with("bed") {
            "bed"
        } else if n.starts_with("bath") {
            "bath"
        } else if n.starts_with("living") {
            "living"
        } else if n.starts_with("kitchen") {
            "kitchen"
        } else {
            continue;
        };
        *sig.entry(key.to_string()).or_insert(0) += 1;
    }
    sig
}

/// L1 distance between two signature maps over the union of their keys.
fn l1_distance(a: &BTreeMap<String, usize>, b: &BTreeMap<String, usize>) -> i64 {
    let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    keys.iter()
        .map(|k| {
            let av = *a.get(*k).unwrap_or(&0) as i64;
            let bv = *b.get(*k).unwrap_or(&0) as i64;
            (av - bv).abs()
        })
        .sum()
}

/// Retrieve the best-matching template for a brief's room program, with
/// every rectangle clamped to fit inside the envelope. Returns `None` if
/// the brief has no rooms at all.
pub fn retrieve_seed(brief: &Brief) -> Option<LayoutResult> {
    if brief.rooms.is_empty() {
        return None;
    }

    let target_sig = program_signature(&brief.rooms);
    let best = TEMPLATES
        .iter()
        .min_by_key(|t| l1_distance(&target_sig, &template_signature(t)))?;

    let mut rooms = Vec::new();
    for spec in &brief.rooms {
        if let Some((_, x, y, w, h)) = best
            .rooms
            .iter()
            .find(|(name, ..)| name.eq_ignore_ascii_case(&spec.name))
        {
            rooms.push(clamp_to_envelope(
                PlacedRoom {
                    name: spec.name.clone(),
                    x: *x,
                    y: *y,
                    w: *w,
                    h: *h,
                    is_corridor: false,
                },
                brief.envelope_w,
                brief.envelope_h,
            ));
        }
    }

    let _ = best.name;
    Some(LayoutResult {
        rooms,
        dropped: vec![],
    })
}

fn clamp_to_envelope(mut room: PlacedRoom, env_w: f64, env_h: f64) -> PlacedRoom {
    room.w = room.w.min(env_w);
    room.h = room.h.min(env_h);
    room.x = room.x.max(0.0).min(env_w - room.w);
    room.y = room.y.max(0.0).min(env_h - room.h);
    room
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
    fn no_rooms_returns_none() {
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
        assert!(retrieve_seed(&brief).is_none());
    }

    #[test]
    fn retrieved_rooms_stay_within_envelope() {
        let brief = Brief {
            rooms: vec![spec("living"), spec("kitchen"), spec("bed1"), spec("bath1")],
            envelope_w: 900.0,
            envelope_h: 700.0,
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
        let seed = retrieve_seed(&brief).unwrap();
        for r in &seed.rooms {
            assert!(r.x >= 0.0 && r.x1() <= brief.envelope_w + 1e-6);
            assert!(r.y >= 0.0 && r.y1() <= brief.envelope_h + 1e-6);
        }
    }
}
