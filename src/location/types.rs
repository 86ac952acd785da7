//! Location acquisition types.

use crate::geo::Coordinate;
use thiserror::Error;

/// How a location acquisition resolved.
///
/// Every acquisition resolves to exactly one outcome; anything other than
/// [`LocationOutcome::Measured`] means the configured fallback coordinate
/// was returned instead of a live fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    /// A live position was measured within the timeout.
    Measured,
    /// The user denied the position permission.
    PermissionDenied,
    /// The sensor could not produce a position.
    PositionUnavailable,
    /// The read did not complete within the configured timeout.
    Timeout,
    /// The environment has no position capability at all.
    Unsupported,
    /// The source failed in a way that fits no other classification.
    Unknown,
}

impl LocationOutcome {
    /// Short human-readable description for notifications.
    pub fn describe(&self) -> &'static str {
        match self {
            LocationOutcome::Measured => "Location measured",
            LocationOutcome::PermissionDenied => "Location permission was denied",
            LocationOutcome::PositionUnavailable => "Your position could not be determined",
            LocationOutcome::Timeout => "The location request timed out",
            LocationOutcome::Unsupported => "This device does not support location",
            LocationOutcome::Unknown => "Location lookup failed",
        }
    }
}

/// A resolved location: the coordinate to use plus how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub outcome: LocationOutcome,
}

impl LocationFix {
    /// True when the coordinate came from a live measurement.
    pub fn is_measured(&self) -> bool {
        self.outcome == LocationOutcome::Measured
    }
}

/// Errors a position source can report.
#[derive(Debug, Clone, Error)]
pub enum FixError {
    /// The user denied the position permission.
    #[error("position permission denied")]
    PermissionDenied,

    /// The sensor could not produce a position.
    #[error("position unavailable")]
    PositionUnavailable,

    /// The environment has no position capability.
    #[error("no position capability in this environment")]
    Unsupported,

    /// Source-specific failure.
    #[error("position source error: {0}")]
    Source(String),
}

impl FixError {
    /// Classifies the error into its acquisition outcome.
    pub fn outcome(&self) -> LocationOutcome {
        match self {
            FixError::PermissionDenied => LocationOutcome::PermissionDenied,
            FixError::PositionUnavailable => LocationOutcome::PositionUnavailable,
            FixError::Unsupported => LocationOutcome::Unsupported,
            FixError::Source(_) => LocationOutcome::Unknown,
        }
    }
}
