//! Categorized nearby search
//!
//! Discovers maritime points of interest around an origin by running one
//! provider query per category on a staggered timeline, then aggregating
//! whatever succeeded into a single distance-ranked sequence. Individual
//! categories fail independently; only a missing search capability fails
//! the run as a whole.

mod category;
mod orchestrator;
mod stats;
mod types;

pub use category::{default_categories, CategoryQuery, PoiCategory};
pub use orchestrator::{SearchConfig, SearchOrchestrator};
pub use stats::{SearchStats, SearchStatsSnapshot};
pub use types::{PointOfInterest, SearchError};
