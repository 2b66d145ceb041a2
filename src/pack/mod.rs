//! S4 — Heuristic packer.
//!
//! Three packing strategies, escalating in how much structure they impose:
//! plain next-fit descending-height packing, hub-first packing (anchor the
//! largest "hub" room first, then place the rest around it), and
//! corridor-based packing (reserve a band for circulation, pack rooms
//! above/below it). Grounded on `pack_next_fit` in the retrieval pack's
//! packing prototype; `pack_with_hub`/`pack_with_corridor` have no
//! prototype to port and are implemented from their textual contracts.

pub mod corridor;

use crate::brief::{Brief, LayoutResult, PlacedRoom};
use crate::sizer::choose_size;

/// Pack every room in `brief` left-to-right, wrapping to a new row when a
/// room would overflow the envelope width, sorted by descending height so
/// taller rooms anchor each row. A post-pass nudges rooms toward their
/// preferred adjacency partners when doing so doesn't increase Manhattan
/// center distance to the envelope origin disproportionately.
pub fn pack_next_fit(brief: &Brief) -> LayoutResult {
    let mut sized: Vec<(String, f64, f64)> = brief
        .rooms
        .iter()
        .map(|r| {
            if let Some(pin) = brief.pin_for(&r.name).filter(|p| p.locks_size()) {
                (r.name.clone(), pin.w.unwrap(), pin.h.unwrap())
            } else {
                let (w, h) = choose_size(r);
                (r.name.clone(), w, h)
            }
        })
        .collect();
    sized.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut rooms = Vec::with_capacity(sized.len());
    let mut dropped = Vec::new();
    let mut cursor_x = 0.0_f64;
    let mut cursor_y = 0.0_f64;
    let mut row_h = 0.0_f64;

    for (name, w, h) in sized {
        if let Some(pin) = brief.pin_for(&name).filter(|p| p.locks_position()) {
            rooms.push(PlacedRoom {
                name,
                x: pin.x.unwrap(),
                y: pin.y.unwrap(),
                w,
                h,
                is_corridor: false,
            });
            continue;
        }

        // A room wider or taller than the whole envelope can never be
        // placed regardless of row position — drop it immediately rather
        // than let it silently overflow the envelope invariant.
        if w > brief.envelope_w || h > brief.envelope_h {
            dropped.push(name);
            continue;
        }

        if cursor_x + w > brief.envelope_w {
            cursor_x = 0.0;
            cursor_y += row_h;
            row_h = 0.0;
        }
        if cursor_y + h > brief.envelope_h {
            dropped.push(name);
            continue;
        }
        rooms.push(PlacedRoom {
            name,
            x: cursor_x,
            y: cursor_y,
            w,
            h,
            is_corridor: false,
        });
        cursor_x += w;
        row_h = row_h.max(h);
    }

    swap_toward_adjacency(&mut rooms, brief);

    LayoutResult { rooms, dropped }
}

/// Post-pass: for each preferred-adjacency pair whose Manhattan center
/// distance exceeds half the envelope width, swap the two rooms' positions
/// if doing so shortens that distance. Mirrors the adjacency-swap heuristic
/// in the packing prototype.
fn swap_toward_adjacency(rooms: &mut [PlacedRoom], brief: &Brief) {
    let half_w = brief.envelope_w / 2.0;
    for (a, b, _weight) in brief.all_adjacency_pairs() {
        let ia = rooms.iter().position(|r| r.name == a);
        let ib = rooms.iter().position(|r| r.name == b);
        let (Some(ia), Some(ib)) = (ia, ib) else {
            continue;
        };
        if ia == ib {
            continue;
        }
        let (ca, cb) = (rooms[ia].center(), rooms[ib].center());
        let dist = (ca.0 - cb.0).abs() + (ca.1 - cb.1).abs();
        if dist <= half_w {
            continue;
        }
        let pos_a = (rooms[ia].x, rooms[ia].y);
        let pos_b = (rooms[ib].x, rooms[ib].y);
        rooms[ia].x = pos_b.0;
        rooms[ia].y = pos_b.1;
        rooms[ib].x = pos_a.0;
        rooms[ib].y = pos_a.1;
    }
}

/// Identify the "hub" room: the first room whose name indicates a corridor,
/// else the first living-prefixed room, else simply the first room.
pub fn choose_hub<'a>(brief: &'a Brief) -> Option<&'a str> {
    brief
        .rooms
        .iter()
        .find(|r| crate::brief::is_corridor_name(&r.name))
        .or_else(|| brief.rooms.iter().find(|r| r.name.to_lowercase().starts_with("living")))
        .or_else(|| brief.rooms.first())
        .map(|r| r.name.as_str())
}

/// Pack with the hub room anchored at the envelope origin first, then pack
/// the remaining rooms around it using the same next-fit strategy,
/// preferring placements that touch the hub.
pub fn pack_with_hub(brief: &Brief) -> LayoutResult {
    let Some(hub_name) = choose_hub(brief) else {
        return LayoutResult::default();
    };

    let hub_spec = brief.rooms.iter().find(|r| r.name == hub_name).unwrap();
    let (hub_w, hub_h) = choose_size(hub_spec);

    // The anchor itself can be oversized for the envelope. Clamping it
    // would silently shrink it below its own minimums (breaking the
    // drop-not-shrink contract every other room gets); there's also no
    // room left to anchor around once it no longer fits. Drop it like any
    // other oversized room and fall back to unanchored next-fit packing
    // for everything else.
    if hub_w > brief.envelope_w || hub_h > brief.envelope_h {
        let rest_brief = Brief {
            rooms: brief.rooms.iter().filter(|r| r.name != hub_name).cloned().collect(),
            ..brief.clone()
        };
        let mut result = pack_next_fit(&rest_brief);
        result.dropped.insert(0, hub_name.to_string());
        return result;
    }

    let hub = PlacedRoom {
        name: hub_name.to_string(),
        x: 0.0,
        y: 0.0,
        w: hub_w,
        h: hub_h,
        is_corridor: false,
    };

    let mut rooms = vec![hub.clone()];
    let mut dropped = Vec::new();

    // Remaining rooms, largest-height first, placed along the hub's right
    // edge first (touching it), wrapping into new rows beneath once that
    // column is full.
    let mut rest: Vec<_> = brief
        .rooms
        .iter()
        .filter(|r| r.name != hub_name)
        .collect();
    rest.sort_by(|a, b| {
        let (_, ha) = choose_size(a);
        let (_, hb) = choose_size(b);
        hb.partial_cmp(&ha).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut cursor_x = hub.x1();
    let mut cursor_y = 0.0_f64;
    let mut row_h = 0.0_f64;

    for spec in rest.drain(..) {
        let (w, h) = choose_size(spec);
        if w > brief.envelope_w || h > brief.envelope_h {
            dropped.push(spec.name.clone());
            continue;
        }
        if cursor_x + w > brief.envelope_w {
            cursor_x = 0.0;
            cursor_y = row_h.max(hub.y1());
            row_h = cursor_y;
        }
        if cursor_y + h > brief.envelope_h {
            dropped.push(spec.name.clone());
            continue;
        }
        rooms.push(PlacedRoom {
            name: spec.name.clone(),
            x: cursor_x,
            y: cursor_y,
            w,
            h,
            is_corridor: false,
        });
        cursor_x += w;
        row_h = row_h.max(cursor_y + h);
    }

    LayoutResult { rooms, dropped }
}
