//! Nearby place-search client.
//!
//! Speaks the mapping engine's nearby-search wire contract: one GET per
//! query carrying the origin, radius, and keyword string, answered by a
//! JSON body with a status code and a ranked result list.
//!
//! # API Endpoint
//!
//! - Nearby search: `{base}/nearbysearch/json?location={lat},{lng}&radius={m}&keyword={kw}&key={API_KEY}`
//! - Photo resolution: `{base}/photo?maxwidth=400&photo_reference={ref}&key={API_KEY}`

use crate::provider::{
    AsyncHttpClient, NearbyQuery, PlaceResult, PlaceSearch, ProviderError, SearchResponse,
    SearchStatus,
};

use crate::geo::Coordinate;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Maximum width requested for resolved place photos.
const PHOTO_MAX_WIDTH: u32 = 400;

/// Place-search client backed by the engine's HTTP search API.
///
/// Requires a valid engine API key; the engine loader only hands out a
/// search surface after the credential was accepted.
pub struct HttpPlacesClient<C: AsyncHttpClient> {
    http_client: C,
    base_url: String,
    api_key: String,
}

impl<C: AsyncHttpClient> HttpPlacesClient<C> {
    /// Creates a new place-search client.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Engine search API base URL, without trailing slash
    /// * `api_key` - Engine API credential
    pub fn new(http_client: C, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Builds the nearby-search URL for the given query.
    ///
    /// The wire contract takes the radius in meters and a `+`-separated
    /// keyword string.
    fn build_url(&self, query: &NearbyQuery) -> String {
        let radius_m = (query.radius_km * 1000.0).round() as u64;
        format!(
            "{}/nearbysearch/json?location={},{}&radius={}&keyword={}&key={}",
            self.base_url,
            query.origin.lat(),
            query.origin.lng(),
            radius_m,
            query.keyword.replace(' ', "+"),
            self.api_key
        )
    }

    /// Resolves a photo reference into a fetchable URL.
    fn photo_url(&self, reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photo_reference={}&key={}",
            self.base_url, PHOTO_MAX_WIDTH, reference, self.api_key
        )
    }

    /// Maps one raw wire result, dropping results without a usable position.
    fn map_result(&self, raw: RawPlace) -> Option<PlaceResult> {
        let position = raw.geometry.as_ref()?.location.as_ref()?;
        let location = match Coordinate::new(position.lat, position.lng) {
            Ok(c) => c,
            Err(e) => {
                warn!(name = %raw.name, error = %e, "Dropping result with invalid position");
                return None;
            }
        };

        let photo_url = raw
            .photos
            .first()
            .map(|photo| self.photo_url(&photo.photo_reference));

        Some(PlaceResult {
            name: raw.name,
            location,
            rating: raw.rating,
            price_level: raw.price_level,
            photo_url,
            vicinity: raw.vicinity,
            provider_id: raw.place_id,
        })
    }
}

#[async_trait]
impl<C: AsyncHttpClient> PlaceSearch for HttpPlacesClient<C> {
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<SearchResponse, ProviderError> {
        let url = self.build_url(query);
        let body = self.http_client.get(&url).await?;

        let raw: RawSearchResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Malformed body: {}", e)))?;

        let status = SearchStatus::from_wire(&raw.status);
        debug!(
            keyword = %query.keyword,
            status = %status,
            results = raw.results.len(),
            "Nearby search response"
        );

        let results = if status.is_ok() {
            raw.results
                .into_iter()
                .filter_map(|r| self.map_result(r))
                .collect()
        } else {
            Vec::new()
        };

        Ok(SearchResponse { status, results })
    }

    fn name(&self) -> &str {
        "Engine Places"
    }
}

/// Wire format of a nearby-search response body.
#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    name: String,
    geometry: Option<RawGeometry>,
    rating: Option<f64>,
    price_level: Option<u8>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    vicinity: Option<String>,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}
