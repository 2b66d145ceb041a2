//! Room sizing: turns a target area + minimum dimensions into a concrete
//! width/height, grounded on `_choose_size` in the original solver.

use crate::brief::RoomSpec;

/// Choose a width/height for a room given its target area and minimum
/// dimensions: start from a near-square footprint, then grow the shorter
/// side until the target area is met.
pub fn choose_size(spec: &RoomSpec) -> (f64, f64) {
    let min_w = spec.min_w.max(1.0);
    let min_h = spec.min_h.max(1.0);
    let w0 = min_w.max(spec.target_area.sqrt().floor());
    let h0 = min_h.max((spec.target_area / w0).ceil());
    (w0, h0)
}
