//! Crossing event types.

use chrono::{DateTime, Utc};
use std::fmt;

/// Direction of a geofence crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingDirection {
    /// Moved from outside the zone to inside.
    Entered,
    /// Moved from inside the zone to outside.
    Exited,
}

impl fmt::Display for CrossingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossingDirection::Entered => write!(f, "entered"),
            CrossingDirection::Exited => write!(f, "exited"),
        }
    }
}

/// One geofence crossing.
///
/// Events are append-only: once emitted they are never mutated, and the
/// session log only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingEvent {
    /// Name of the boundary that was crossed.
    pub boundary_name: String,
    /// Crossing direction.
    pub direction: CrossingDirection,
    /// When the crossing was observed.
    pub at: DateTime<Utc>,
}
