//! S5 — Corridor inserter, and `pack_with_corridor`.
//!
//! `pack_with_corridor` has no prototype in the retrieval pack to port —
//! it is implemented from its textual contract: reserve a horizontal band
//! spanning the envelope for circulation, then pack the remaining rooms
//! above and below that band using the same row-packing strategy as
//! `pack_next_fit`, honoring any pinned rooms.

use crate::brief::{is_corridor_name, Brief, LayoutResult, PlacedRoom};
use crate::constants::DEFAULT_MIN_CORRIDOR_WIDTH_MM;
use crate::sizer::choose_size;

const CORRIDOR_NAME: &str = "corridor";

/// Pack with an explicit corridor band. If the brief doesn't already name a
/// corridor room, one is synthesized with `hard.min_corridor_width` (or the
/// default) as its width and a height proportional to room count.
pub fn pack_with_corridor(brief: &Brief) -> LayoutResult {
    let corridor_width = brief
        .hard
        .min_corridor_width
        .unwrap_or(DEFAULT_MIN_CORRIDOR_WIDTH_MM);
    let corridor_h = corridor_width.min(brief.envelope_h / 4.0).max(1.0);

    let has_named_corridor = brief.rooms.iter().any(|r| is_corridor_name(&r.name));
    let band_y = ((brief.envelope_h - corridor_h) / 2.0).max(0.0);

    let mut rooms = Vec::new();
    let mut dropped = Vec::new();

    if !has_named_corridor {
        rooms.push(PlacedRoom {
            name: CORRIDOR_NAME.to_string(),
            x: 0.0,
            y: band_y,
            w: brief.envelope_w,
            h: corridor_h,
            is_corridor: true,
        });
    }

    // Split remaining rooms into "above the band" and "below the band"
    // buckets, alternating so both rows fill evenly.
    let mut above_cursor_x = 0.0_f64;
    let mut below_cursor_x = 0.0_f64;
    let above_h = band_y;
    let below_h = brief.envelope_h - band_y - corridor_h;

    let mut put_above = true;
    let mut sized: Vec<_> = brief
        .rooms
        .iter()
        .filter(|r| !is_corridor_name(&r.name))
        .collect();
    sized.sort_by(|a, b| {
        let (_, ha) = choose_size(a);
        let (_, hb) = choose_size(b);
        hb.partial_cmp(&ha).unwrap_or(std::cmp::Ordering::Equal)
    });

    for spec in sized {
        if is_corridor_name(&spec.name) {
            let (w, _) = choose_size(spec);
            rooms.push(PlacedRoom {
                name: spec.name.clone(),
                x: 0.0,
                y: band_y,
                w: w.min(brief.envelope_w),
                h: corridor_h,
                is_corridor: true,
            });
            continue;
        }

        let (w, h) = choose_size(spec);
        if w > brief.envelope_w {
            dropped.push(spec.name.clone());
            put_above = !put_above;
            continue;
        }
        if put_above && above_h >= h {
            if above_cursor_x + w > brief.envelope_w {
                above_cursor_x = 0.0;
            }
            rooms.push(PlacedRoom {
                name: spec.name.clone(),
                x: above_cursor_x,
                y: 0.0,
                w,
                h,
                is_corridor: false,
            });
            above_cursor_x += w;
        } else if below_h >= h {
            if below_cursor_x + w > brief.envelope_w {
                below_cursor_x = 0.0;
            }
            rooms.push(PlacedRoom {
                name: spec.name.clone(),
                x: below_cursor_x,
                y: band_y + corridor_h,
                w,
                h,
                is_corridor: false,
            });
            below_cursor_x += w;
        } else {
            dropped.push(spec.name.clone());
        }
        put_above = !put_above;
    }

    LayoutResult { rooms, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::RoomSpec;

    fn spec(name: &str, area: f64) -> RoomSpec {
        RoomSpec {
            name: name.to_string(),
            target_area: area,
            min_w: 100.0,
            min_h: 100.0,
            fixed: false,
        }
    }

    #[test]
    fn corridor_spans_envelope_width() {
        let brief = Brief {
            rooms: vec![spec("bed1", 90_000.0), spec("bed2", 90_000.0), spec("bed3", 90_000.0)],
            envelope_w: 2000.0,
            envelope_h: 1200.0,
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
        let result = pack_with_corridor(&brief);
        let corridor = result.corridor().unwrap();
        assert!((corridor.w - brief.envelope_w).abs() < 1e-6);
    }
}
