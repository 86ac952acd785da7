//! Boundary dataset store.
//!
//! Fetches the geofence polygon once per session from a feature-data
//! service, validates it, and caches the outcome. The boundary overlay is
//! a nice-to-have: any failure degrades to an absent boundary rather than
//! spending retry budget or surfacing an error to the caller.

use super::types::{BoundaryError, BoundaryPolygon};
use crate::provider::AsyncHttpClient;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Boundary store configuration.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Feature-data service endpoint.
    pub endpoint: String,
    /// Region identifier (`mrgid`) selecting the zone.
    pub region_id: u32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://geo.vliz.be/geoserver/MarineRegions/wfs".to_string(),
            region_id: 8480,
        }
    }
}

impl BoundaryConfig {
    /// Sets the feature-data service endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the region identifier to filter by.
    pub fn with_region_id(mut self, region_id: u32) -> Self {
        self.region_id = region_id;
        self
    }
}

/// Session-scoped source of the cached boundary polygon.
///
/// Kept dyn-safe so the session facade can hold it as a trait object.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Returns the session's boundary polygon, fetching it on first call.
    ///
    /// `None` means the boundary is unavailable for this session;
    /// containment checks must then be skipped entirely.
    async fn load(&self) -> Option<Arc<BoundaryPolygon>>;

    /// Clears the session cache so the next [`BoundarySource::load`]
    /// fetches again. Used by the manual retry path.
    async fn invalidate(&self);
}

/// Boundary store backed by an HTTP feature-data service.
pub struct BoundaryStore<C: AsyncHttpClient> {
    http_client: C,
    config: BoundaryConfig,
    cache: Mutex<Option<Option<Arc<BoundaryPolygon>>>>,
}

impl<C: AsyncHttpClient> BoundaryStore<C> {
    /// Creates a new boundary store.
    pub fn new(http_client: C, config: BoundaryConfig) -> Self {
        Self {
            http_client,
            config,
            cache: Mutex::new(None),
        }
    }

    /// Builds the GetFeature request URL with the region filter.
    fn request_url(&self) -> String {
        format!(
            "{}?service=WFS&version=1.0.0&request=GetFeature&typeName=MarineRegions:eez&outputFormat=application/json&cql_filter=mrgid%3D{}",
            self.config.endpoint, self.config.region_id
        )
    }

    async fn fetch(&self) -> Result<BoundaryPolygon, BoundaryError> {
        let url = self.request_url();
        let body = self
            .http_client
            .get(&url)
            .await
            .map_err(|e| BoundaryError::Http(e.to_string()))?;

        BoundaryPolygon::from_feature_collection(&body)
    }
}

#[async_trait]
impl<C: AsyncHttpClient> BoundarySource for BoundaryStore<C> {
    async fn load(&self) -> Option<Arc<BoundaryPolygon>> {
        // Lock held across the fetch so concurrent callers share one request.
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            return cached.clone();
        }

        let outcome = match self.fetch().await {
            Ok(polygon) => {
                info!(
                    name = %polygon.name,
                    rings = polygon.ring_count(),
                    "Boundary dataset loaded"
                );
                Some(Arc::new(polygon))
            }
            Err(e) => {
                warn!(
                    region_id = self.config.region_id,
                    error = %e,
                    "Boundary unavailable for this session"
                );
                None
            }
        };

        *cache = Some(outcome.clone());
        outcome
    }

    async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use std::sync::atomic::{AtomicU32, Ordering};

    const VALID_BODY: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "properties": {"geoname": "Indian Exclusive Economic Zone", "territory1": "India"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[79.0, 12.0], [82.0, 12.0], [82.0, 14.0], [79.0, 14.0], [79.0, 12.0]]]
            }
        }]
    }"#;

    /// Mock client that counts requests, for cache assertions.
    struct CountingClient {
        response: Result<Vec<u8>, ProviderError>,
        calls: AtomicU32,
    }

    impl CountingClient {
        fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl AsyncHttpClient for &CountingClient {
        async fn get(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_load_returns_parsed_polygon() {
        let client = CountingClient::new(Ok(VALID_BODY.as_bytes().to_vec()));
        let store = BoundaryStore::new(&client, BoundaryConfig::default());

        let polygon = store.load().await.expect("boundary should load");
        assert_eq!(polygon.name, "Indian Exclusive Economic Zone");
        assert_eq!(polygon.territory, "India");
    }

    #[tokio::test]
    async fn test_load_is_cached_for_the_session() {
        let client = CountingClient::new(Ok(VALID_BODY.as_bytes().to_vec()));
        let store = BoundaryStore::new(&client, BoundaryConfig::default());

        assert!(store.load().await.is_some());
        assert!(store.load().await.is_some());
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_absent_and_cached() {
        let client = CountingClient::new(Err(ProviderError::Http("503".to_string())));
        let store = BoundaryStore::new(&client, BoundaryConfig::default());

        assert!(store.load().await.is_none());
        assert!(store.load().await.is_none());
        // A failed fetch is permanent for the session: no retry.
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_absent() {
        let client = CountingClient::new(Ok(b"<html>oops</html>".to_vec()));
        let store = BoundaryStore::new(&client, BoundaryConfig::default());
        assert!(store.load().await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let client = CountingClient::new(Ok(VALID_BODY.as_bytes().to_vec()));
        let store = BoundaryStore::new(&client, BoundaryConfig::default());

        assert!(store.load().await.is_some());
        store.invalidate().await;
        assert!(store.load().await.is_some());
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_request_url_carries_region_filter() {
        let client = CountingClient::new(Ok(Vec::new()));
        let store = BoundaryStore::new(
            &client,
            BoundaryConfig::default().with_region_id(5668),
        );
        let url = store.request_url();
        assert!(url.contains("cql_filter=mrgid%3D5668"));
        assert!(url.contains("request=GetFeature"));
    }
}
