//! Crossing detection state machine.

use super::types::CrossingDirection;

/// Pure edge detector over a sequence of containment evaluations.
///
/// Emits a direction only on a true state change. The very first
/// evaluation establishes the baseline and never emits; consecutive
/// evaluations that agree emit nothing.
#[derive(Debug, Default)]
pub struct CrossingDetector {
    previous: Option<bool>,
}

impl CrossingDetector {
    /// Creates a detector with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one containment evaluation; returns the crossing it
    /// completes, if any.
    pub fn observe(&mut self, inside: bool) -> Option<CrossingDirection> {
        let crossing = match self.previous {
            Some(previous) if previous != inside => {
                if inside {
                    Some(CrossingDirection::Entered)
                } else {
                    Some(CrossingDirection::Exited)
                }
            }
            _ => None,
        };
        self.previous = Some(inside);
        crossing
    }
}
