//! Provider types and traits

use crate::geo::Coordinate;
use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed
    Http(String),
    /// Invalid response data from provider
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Provider-reported status of a nearby-search query.
///
/// Only [`SearchStatus::Ok`] responses carry results worth aggregating;
/// every other status is logged and skipped by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    Unknown(String),
}

impl SearchStatus {
    /// Maps the provider's wire status string.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "OK" => SearchStatus::Ok,
            "ZERO_RESULTS" => SearchStatus::ZeroResults,
            "OVER_QUERY_LIMIT" => SearchStatus::OverQueryLimit,
            "REQUEST_DENIED" => SearchStatus::RequestDenied,
            "INVALID_REQUEST" => SearchStatus::InvalidRequest,
            other => SearchStatus::Unknown(other.to_string()),
        }
    }

    /// True when the response carries aggregatable results.
    pub fn is_ok(&self) -> bool {
        matches!(self, SearchStatus::Ok)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Ok => write!(f, "OK"),
            SearchStatus::ZeroResults => write!(f, "ZERO_RESULTS"),
            SearchStatus::OverQueryLimit => write!(f, "OVER_QUERY_LIMIT"),
            SearchStatus::RequestDenied => write!(f, "REQUEST_DENIED"),
            SearchStatus::InvalidRequest => write!(f, "INVALID_REQUEST"),
            SearchStatus::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// One nearby-search request.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    /// Search center.
    pub origin: Coordinate,
    /// Search radius in kilometers.
    pub radius_km: f64,
    /// Free-text keyword string for the query.
    pub keyword: String,
}

/// One place returned by a nearby-search query.
#[derive(Debug, Clone)]
pub struct PlaceResult {
    /// Display name of the place.
    pub name: String,
    /// Geographic position of the place.
    pub location: Coordinate,
    /// Provider rating in [0, 5], when available.
    pub rating: Option<f64>,
    /// Provider price tier, when available.
    pub price_level: Option<u8>,
    /// Resolved photo URL for the place's first photo, when available.
    pub photo_url: Option<String>,
    /// Short human-readable locality text.
    pub vicinity: Option<String>,
    /// Provider-scoped stable identifier.
    pub provider_id: Option<String>,
}

/// Response to a nearby-search query.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    /// Provider-reported query status.
    pub status: SearchStatus,
    /// Results, in the provider's ranking order. Empty unless status is OK.
    pub results: Vec<PlaceResult>,
}

/// Trait for nearby place-search providers.
///
/// This is the capability surface the mapping engine exposes once loaded.
/// Kept dyn-safe so the engine handle can carry it as a trait object.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Runs one nearby-search query.
    ///
    /// A non-OK [`SearchStatus`] is a valid response, not an error; `Err`
    /// is reserved for transport and payload failures.
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<SearchResponse, ProviderError>;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
