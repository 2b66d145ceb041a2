//! Centralized layout constants for the floor-plan generation core.
//!
//! Eliminates magic numbers duplicated across the packer, refiner, repair
//! pass, and scene lifter. Per-module tuning values that only one stage
//! cares about remain local to that module.

// =====================================================
// Units
// =====================================================

/// Vertical distance between floors, millimetres.
pub const FLOOR_HEIGHT_MM: f64 = 3000.0;

// =====================================================
// Connectivity defaults (brief.connectivity)
// =====================================================

/// Minimum shared edge length (mm) between a private room and the corridor
/// for the room to count as corridor-connected.
pub const DEFAULT_MIN_OVERLAP: u32 = 50;

/// Minimum number of private rooms before a corridor is inserted at all.
pub const DEFAULT_MIN_PRIVATE_FOR_CORRIDOR: usize = 3;

// =====================================================
// Geometric repair
// =====================================================

/// Grid size (mm) that `snap_and_align` rounds room edges to.
pub const SNAP_GRID_MM: i64 = 10;

/// Outer margin (mm) kept clear between the envelope boundary and any room.
pub const OUTER_MARGIN_MM: i64 = 20;

/// Row/column merge tolerance (mm) used when aligning nearly-flush edges.
pub const ALIGN_TOLERANCE_MM: i64 = 10;

/// Step size (mm) used by `attract_to_hub` / `attract_to_corridor` per iteration.
pub const ATTRACT_STEP_MM: i64 = 20;

/// Iteration cap for hub/corridor attraction passes.
pub const ATTRACT_MAX_ITERS: u32 = 20;

/// Step size (mm) used by the nudge-toward-target pass.
pub const NUDGE_STEP_MM: i64 = 10;

/// Pass cap for `resolve_overlaps`.
pub const RESOLVE_OVERLAPS_MAX_PASSES: u32 = 20;

/// Pass cap for the isolated-room connectivity snap.
pub const CONNECTIVITY_MAX_PASSES: u32 = 3;

// =====================================================
// CP-style refiner
// =====================================================

/// Default wall-clock budget for the local-search refiner (seconds).
pub const REFINE_TIME_LIMIT_S: f64 = 0.5;

/// Wall-clock budget when a corridor is present (larger search space).
pub const REFINE_TIME_LIMIT_WITH_CORRIDOR_S: f64 = 1.25;

// =====================================================
// Scene lifter — openings & fixtures
// =====================================================

pub const DOOR_W_MM: f64 = 90.0;
pub const DOOR_H_MM: f64 = 2000.0;

pub const WINDOW_W_MM: f64 = 120.0;
pub const WINDOW_H_MM: f64 = 1200.0;

/// Wall boundary thickness (mm).
pub const WALL_THICKNESS_MM: f64 = 100.0;

/// Stair fixture footprint (mm).
pub const STAIR_W_MM: f64 = 1500.0;
pub const STAIR_H_MM: f64 = 3000.0;

// =====================================================
// Soft-cost evaluator — default weights
// =====================================================

pub const DEFAULT_WEIGHT_ADJACENCY_MISSING: f64 = 1.0;
pub const DEFAULT_WEIGHT_BEDROOM_PRIVACY: f64 = 1.0;
pub const DEFAULT_WEIGHT_ASPECT_RATIO_DEVIATION: f64 = 0.5;
pub const DEFAULT_WEIGHT_AREA_TARGET_DEVIATION: f64 = 0.2;
pub const DEFAULT_WEIGHT_HUB_DISTANCE: f64 = 0.3;

/// Default aspect ratio target/tolerance (soft objectives).
pub const DEFAULT_ASPECT_RATIO_TARGET: f64 = 1.5;
pub const DEFAULT_ASPECT_RATIO_TOLERANCE: f64 = 0.5;

// =====================================================
// Critic / candidate selection
// =====================================================

/// Weight applied to the daylight penalty term in candidate scoring.
pub const DAYLIGHT_PENALTY_WEIGHT: f64 = 0.5;

/// Number of jittered variants generated around the refined base layout.
pub const VARIANT_COUNT: usize = 3;

/// Number of topology-only candidates proposed before seeding/packing.
pub const TOPOLOGY_CANDIDATE_COUNT: usize = 2;

// =====================================================
// Rule catalog defaults
// =====================================================

/// Minimum corridor width (mm) enforced by the default rule catalog.
pub const DEFAULT_MIN_CORRIDOR_WIDTH_MM: f64 = 900.0;

/// Minimum bedroom area (mm^2) enforced by the default rule catalog.
pub const DEFAULT_MIN_BEDROOM_AREA_MM2: f64 = 70_000.0;

// =====================================================
// Metrics
// =====================================================

/// Area normalization factor used by `violations_per_100m2` (mm^2 per 100m^2).
pub const VIOLATIONS_NORMALIZATION_MM2: f64 = 1.0e8;
