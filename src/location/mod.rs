//! Position acquisition
//!
//! Acquires the user's current coordinates from a platform position
//! source with a bounded wait, classifying every failure into a
//! deterministic fallback outcome. The rest of the pipeline never sees a
//! missing location: a fix always comes back, either measured or the
//! configured default anchor.

mod provider;
mod source;
mod types;

pub use provider::{LocationConfig, LocationProvider, DEFAULT_ANCHOR};
pub use source::PositionSource;
pub use types::{FixError, LocationFix, LocationOutcome};

#[cfg(test)]
pub use source::tests::{MockPositionSource, StalledPositionSource};
