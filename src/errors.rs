//! Error types returned as data across the public boundary.
//!
//! Following this crate's own convention elsewhere (plain enums deriving
//! `Serialize`/`Deserialize`, no exception-style propagation into response
//! payloads), validation and refinement failures are values, not panics.

use serde::{Deserialize, Serialize};

/// Failure to normalize a raw `Brief` into a usable one (S1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BriefError {
    /// No rooms were supplied at all.
    NoRooms,
    /// A room name was empty or duplicated.
    InvalidRoomName { name: String },
    /// `envelope_w` or `envelope_h` was not positive.
    InvalidEnvelope { w: f64, h: f64 },
    /// A hard constraint referenced a room name that does not exist.
    UnknownRoomReference { name: String },
}

impl std::fmt::Display for BriefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BriefError::NoRooms => write!(f, "brief has no rooms"),
            BriefError::InvalidRoomName { name } => {
                write!(f, "invalid or duplicate room name: {name}")
            }
            BriefError::InvalidEnvelope { w, h } => {
                write!(f, "envelope must be positive, got {w}x{h}")
            }
            BriefError::UnknownRoomReference { name } => {
                write!(f, "reference to unknown room: {name}")
            }
        }
    }
}

impl std::error::Error for BriefError {}

/// Outcome of a local-search refinement pass (S6), mirroring the four
/// terminal statuses a CP/MIP solver would report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefineOutcome {
    /// Converged with the objective at (or provably near) its minimum.
    Optimal,
    /// A valid, improved-or-equal layout was found within the time budget.
    Feasible,
    /// No layout satisfying the hard postconditions was found.
    Infeasible,
    /// The time budget expired before any conclusion could be reached.
    Unknown,
}

impl RefineOutcome {
    /// Whether this outcome carries a layout that should replace the input.
    pub fn accepts_result(self) -> bool {
        matches!(self, RefineOutcome::Optimal | RefineOutcome::Feasible)
    }
}
