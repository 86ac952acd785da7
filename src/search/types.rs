//! Search result types.

use super::category::PoiCategory;
use crate::geo::Coordinate;
use thiserror::Error;

/// A ranked point of interest.
///
/// Created by the orchestrator when a provider result is mapped and
/// immutable afterwards; each orchestration run replaces the full ranked
/// sequence wholesale.
#[derive(Debug, Clone)]
pub struct PointOfInterest {
    /// Identifier unique within one orchestration run, derived as
    /// `category_index * 10 + result_index` so ordering is reproducible
    /// given identical provider responses.
    pub id: u32,
    /// Display name of the place.
    pub name: String,
    /// Category of the query that discovered the place.
    pub category: PoiCategory,
    /// Geographic position.
    pub location: Coordinate,
    /// Great-circle distance from the search origin, in kilometers.
    pub distance_km: f64,
    /// Short description (provider locality text when available).
    pub description: String,
    /// Provider rating in [0, 5], when available.
    pub rating: Option<f64>,
    /// Provider-scoped stable identifier, when available.
    pub provider_id: Option<String>,
    /// Provider price tier, when available.
    pub price_level: Option<u8>,
    /// Photo URLs; at most one entry.
    pub photo_urls: Vec<String>,
}

/// Errors the search orchestrator can surface.
///
/// Per-category failures are absorbed into the batch; only failures that
/// affect the whole run surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The engine exposes no place-search capability at all.
    #[error("place search is unavailable")]
    Unavailable,
}
