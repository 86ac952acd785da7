//! Maritime boundary dataset
//!
//! Fetches, validates, and caches the exclusive economic zone polygon used
//! for geofence evaluation. The dataset is loaded at most once per session;
//! any fetch or validation failure degrades to an absent boundary, in which
//! case containment checks are skipped for the rest of the session.

mod store;
mod types;

pub use store::{BoundaryConfig, BoundarySource, BoundaryStore};
pub use types::{BoundaryError, BoundaryPolygon};
