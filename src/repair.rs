//! S7 — Geometric repair.
//!
//! A sequence of small, idempotent passes that take a layout which may have
//! overlaps, gaps, or disconnected rooms, and push it toward one that
//! satisfies the hard postconditions (no overlap, hub/corridor touch,
//! snapped to a grid). Grounded on `refine.py` in the retrieval pack's
//! solver prototype — `resolve_overlaps`, `attract_to_hub`,
//! `attract_to_corridor`, `ensure_connectivity`, `ensure_corridor_overlap`,
//! `keep_corridor_clear`, `legalize_no_overlap`, and `snap_and_align` are
//! each a direct port.

use crate::brief::{is_private_room, Brief, LayoutResult, PinRoom, PlacedRoom};
use crate::constants::{
    ALIGN_TOLERANCE_MM, ATTRACT_MAX_ITERS, ATTRACT_STEP_MM, CONNECTIVITY_MAX_PASSES,
    NUDGE_STEP_MM, OUTER_MARGIN_MM, RESOLVE_OVERLAPS_MAX_PASSES, SNAP_GRID_MM,
};
use crate::pack::choose_hub;

/// Run the full repair chain in the order the original solver's
/// orchestrator applies them.
pub fn repair(layout: &mut LayoutResult, brief: &Brief) {
    nudge_toward_target(layout, brief, 2);
    resolve_overlaps(layout);
    if layout.corridor().is_some() {
        keep_corridor_clear(layout);
        ensure_corridor_overlap(layout, brief.min_overlap());
        resolve_overlaps(layout);
    } else {
        ensure_connectivity(layout, brief);
        if let Some(hub) = choose_hub(brief) {
            attract_to_hub(layout, hub);
        }
        resolve_overlaps(layout);
    }
    legalize_no_overlap(layout, brief);
    snap_and_align(layout);
}

fn is_locked(brief: &Brief, name: &str) -> Option<&PinRoom> {
    brief.pin_for(name).filter(|p| p.is_fully_locked())
}

/// Nudge each room's size toward its target area/aspect ratio, one grid
/// step at a time, without ever overlapping the envelope.
fn nudge_toward_target(layout: &mut LayoutResult, brief: &Brief, iterations: u32) {
    for _ in 0..iterations {
        for spec in &brief.rooms {
            if is_locked(brief, &spec.name).is_some() {
                continue;
            }
            let Some(room) = layout.get_mut(&spec.name) else {
                continue;
            };
            let step = NUDGE_STEP_MM as f64;
            let area = room.area();
            if area < spec.target_area - step * step {
                room.w = (room.w + step).min(brief.envelope_w - room.x);
                room.h = (room.h + step).min(brief.envelope_h - room.y);
            }
            room.w = room.w.max(spec.min_w);
            room.h = room.h.max(spec.min_h);
        }
    }
}

/// Compute the smallest-magnitude axis-aligned displacement that separates
/// two overlapping rectangles, choosing among the four candidate
/// directions (push left/right/up/down).
fn clear_pair(a: &PlacedRoom, b: &PlacedRoom) -> (f64, f64) {
    let push_right = a.x1() - b.x;
    let push_left = b.x1() - a.x;
    let push_down = a.y1() - b.y;
    let push_up = b.y1() - a.y;

    let candidates = [
        (push_right, 0.0),
        (-push_left, 0.0),
        (0.0, push_down),
        (0.0, -push_up),
    ];

    *candidates
        .iter()
        .min_by(|c1, c2| {
            let m1 = c1.0.abs() + c1.1.abs();
            let m2 = c2.0.abs() + c2.1.abs();
            m1.partial_cmp(&m2).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap()
}

/// Resolve pairwise overlaps by nudging rooms apart along the cheapest
/// axis, for up to `RESOLVE_OVERLAPS_MAX_PASSES` passes.
pub fn resolve_overlaps(layout: &mut LayoutResult) {
    for _ in 0..RESOLVE_OVERLAPS_MAX_PASSES {
        let mut any_overlap = false;
        for i in 0..layout.rooms.len() {
            for j in (i + 1)..layout.rooms.len() {
                let (a, b) = (layout.rooms[i].clone(), layout.rooms[j].clone());
                if !a.overlaps(&b) {
                    continue;
                }
                any_overlap = true;
                let (dx, dy) = clear_pair(&a, &b);
                // Move the room with the larger index (arbitrary but
                // deterministic tie-break); push it away from the other.
                layout.rooms[j].x += dx;
                layout.rooms[j].y += dy;
            }
        }
        if !any_overlap {
            break;
        }
    }
}

/// Move isolated rooms toward their nearest neighbor (Manhattan distance)
/// until every room touches at least one other, for up to
/// `CONNECTIVITY_MAX_PASSES` passes.
pub fn ensure_connectivity(layout: &mut LayoutResult, brief: &Brief) {
    for _ in 0..CONNECTIVITY_MAX_PASSES {
        let isolated: Vec<usize> = (0..layout.rooms.len())
            .filter(|&i| {
                !layout
                    .rooms
                    .iter()
                    .enumerate()
                    .any(|(j, r)| j != i && r.touches_or_overlaps(&layout.rooms[i]))
            })
            .collect();
        if isolated.is_empty() {
            break;
        }
        for i in isolated {
            if is_locked(brief, &layout.rooms[i].name).is_some() {
                continue;
            }
            let me = layout.rooms[i].center();
            let nearest = (0..layout.rooms.len())
                .filter(|&j| j != i)
                .min_by(|&a, &b| {
                    let da = manhattan(me, layout.rooms[a].center());
                    let db = manhattan(me, layout.rooms[b].center());
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                });
            let Some(nearest) = nearest else { continue };
            move_toward(&mut layout.rooms, i, nearest, ATTRACT_STEP_MM as f64, ATTRACT_MAX_ITERS);
        }
    }
}

fn manhattan(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Step room `mover` toward room `target`'s center, `iters` times, `step`
/// at a time, stopping early once they touch.
fn move_toward(rooms: &mut [PlacedRoom], mover: usize, target: usize, step: f64, iters: u32) {
    for _ in 0..iters {
        if rooms[mover].touches_or_overlaps(&rooms[target]) {
            break;
        }
        let (mx, my) = rooms[mover].center();
        let (tx, ty) = rooms[target].center();
        let (dx, dy) = (tx - mx, ty - my);
        if dx.abs() > dy.abs() {
            rooms[mover].x += step.copysign(dx);
        } else {
            rooms[mover].y += step.copysign(dy);
        }
    }
}

/// Drift every non-corridor room toward the hub room, on whichever axis is
/// shorter, for up to `ATTRACT_MAX_ITERS` iterations, stopping once it
/// touches the hub.
pub fn attract_to_hub(layout: &mut LayoutResult, hub_name: &str) {
    let Some(hub_idx) = layout.rooms.iter().position(|r| r.name == hub_name) else {
        return;
    };
    for i in 0..layout.rooms.len() {
        if i == hub_idx {
            continue;
        }
        move_toward(&mut layout.rooms, i, hub_idx, ATTRACT_STEP_MM as f64, ATTRACT_MAX_ITERS);
    }
}

/// Drift private (bed/bath) rooms toward the corridor, on the shorter axis,
/// stopping once each reaches `min_overlap` of shared edge with it.
pub fn attract_to_corridor(layout: &mut LayoutResult, min_overlap: u32) {
    let Some(corridor_idx) = layout.rooms.iter().position(|r| r.is_corridor) else {
        return;
    };
    let private: Vec<usize> = layout
        .rooms
        .iter()
        .enumerate()
        .filter(|(i, r)| *i != corridor_idx && is_private_room(&r.name))
        .map(|(i, _)| i)
        .collect();

    for i in private {
        for _ in 0..ATTRACT_MAX_ITERS {
            let overlap = layout.rooms[i].shared_edge_length(&layout.rooms[corridor_idx]);
            if overlap >= min_overlap as f64 {
                break;
            }
            move_toward(&mut layout.rooms, i, corridor_idx, ATTRACT_STEP_MM as f64, 1);
        }
    }
}

/// Slide every private room that touches the corridor but doesn't share
/// `min_overlap` of edge with it, until it does.
pub fn ensure_corridor_overlap(layout: &mut LayoutResult, min_overlap: u32) {
    attract_to_corridor(layout, min_overlap);
}

/// Push rooms that overlap the corridor band out of it, above or below
/// depending on which side of the band their center sits on.
pub fn keep_corridor_clear(layout: &mut LayoutResult) {
    let Some(corridor) = layout.corridor().cloned() else {
        return;
    };
    for room in layout.rooms.iter_mut() {
        if room.is_corridor || !room.overlaps(&corridor) {
            continue;
        }
        let (_, cy) = room.center();
        if cy < corridor.y + corridor.h / 2.0 {
            room.y = corridor.y - room.h;
        } else {
            room.y = corridor.y1();
        }
    }
}

/// Row-packing fallback that guarantees zero overlap, preserving the
/// corridor's position if one exists. Largest-area-first, one row at a
/// time. Used as a last resort when iterative repair hasn't converged.
pub fn legalize_no_overlap(layout: &mut LayoutResult, brief: &Brief) {
    if !layout.has_overlap() {
        return;
    }

    let corridor = layout.corridor().cloned();
    let mut movable: Vec<PlacedRoom> = layout
        .rooms
        .iter()
        .filter(|r| !r.is_corridor)
        .cloned()
        .collect();
    movable.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(std::cmp::Ordering::Equal));

    let mut cursor_x = 0.0;
    let mut cursor_y = 0.0;
    let mut row_h = 0.0_f64;
    let mut repacked = Vec::with_capacity(movable.len());

    for mut room in movable {
        if is_locked(brief, &room.name).is_some() {
            repacked.push(room);
            continue;
        }
        if cursor_x + room.w > brief.envelope_w {
            cursor_x = 0.0;
            cursor_y += row_h;
            row_h = 0.0;
        }
        room.x = cursor_x;
        room.y = cursor_y;
        cursor_x += room.w;
        row_h = row_h.max(room.h);
        repacked.push(room);
    }

    layout.rooms = repacked;
    if let Some(corridor) = corridor {
        layout.rooms.push(corridor);
    }
}

/// Round every room's position and size to the snap grid, then merge
/// nearly-flush row/column edges so adjacent rooms line up exactly.
pub fn snap_and_align(layout: &mut LayoutResult) {
    let grid = SNAP_GRID_MM as f64;
    for room in layout.rooms.iter_mut() {
        room.x = (room.x / grid).round() * grid;
        room.y = (room.y / grid).round() * grid;
        room.w = (room.w / grid).round() * grid;
        room.h = (room.h / grid).round() * grid;
        room.w = room.w.max(grid);
        room.h = room.h.max(grid);
    }

    merge_axis_keys(layout, true);
    merge_axis_keys(layout, false);

    let margin = OUTER_MARGIN_MM as f64;
    for room in layout.rooms.iter_mut() {
        room.x = room.x.max(margin);
        room.y = room.y.max(margin);
    }
}

/// Merge x (or y, if `vertical` is false... see below) coordinates that are
/// within `ALIGN_TOLERANCE_MM` of each other onto a single shared value, so
/// near-flush edges become exactly flush. `along_x` selects which
/// coordinate is merged.
fn merge_axis_keys(layout: &mut LayoutResult, along_x: bool) {
    let tol = ALIGN_TOLERANCE_MM as f64;
    let mut keys: Vec<f64> = layout
        .rooms
        .iter()
        .map(|r| if along_x { r.x } else { r.y })
        .collect();
    keys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    keys.dedup_by(|a, b| (*a - *b).abs() < tol);

    for room in layout.rooms.iter_mut() {
        let v = if along_x { room.x } else { room.y };
        if let Some(&merged) = keys.iter().find(|&&k| (k - v).abs() < tol) {
            if along_x {
                room.x = merged;
            } else {
                room.y = merged;
            }
        }
    }
}
