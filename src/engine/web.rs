//! HTTP-delivered engine transport.
//!
//! Production transport for environments where the mapping engine is
//! bootstrapped over HTTP: one credentialed GET carrying the capability
//! list stands in for the script load, and the attached surface is built
//! over the engine's search API.

use super::handle::{Capability, EngineSurface};
use super::loader::{EngineError, EngineTransport, LoadRequest};
use crate::provider::{AsyncHttpClient, HttpPlacesClient, PlaceSearch};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Web engine transport configuration.
#[derive(Debug, Clone)]
pub struct WebEngineConfig {
    /// Engine bootstrap endpoint; answers the credentialed load request.
    pub bootstrap_url: String,
    /// Base URL of the engine's place-search API.
    pub search_base_url: String,
}

impl Default for WebEngineConfig {
    fn default() -> Self {
        Self {
            bootstrap_url: "https://maps.googleapis.com/maps/api/js".to_string(),
            search_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
        }
    }
}

/// Engine transport that loads over HTTP.
pub struct WebEngineTransport<C: AsyncHttpClient + Clone + 'static> {
    http_client: C,
    config: WebEngineConfig,
    /// The request accepted by a successful load; the surface is built
    /// from it and stays attached for the life of the transport.
    accepted: Mutex<Option<LoadRequest>>,
}

impl<C: AsyncHttpClient + Clone + 'static> WebEngineTransport<C> {
    /// Creates a new transport.
    pub fn new(http_client: C, config: WebEngineConfig) -> Self {
        Self {
            http_client,
            config,
            accepted: Mutex::new(None),
        }
    }

    fn bootstrap_url(&self, request: &LoadRequest) -> String {
        let libraries: Vec<&str> = request.capabilities.iter().map(|c| c.as_str()).collect();
        format!(
            "{}?key={}&libraries={}",
            self.config.bootstrap_url,
            request.api_key,
            libraries.join(",")
        )
    }
}

#[async_trait]
impl<C: AsyncHttpClient + Clone + 'static> EngineTransport for WebEngineTransport<C> {
    async fn load(&self, request: &LoadRequest) -> Result<(), EngineError> {
        let url = self.bootstrap_url(request);
        debug!(url = %url, "Engine bootstrap request");

        self.http_client
            .get(&url)
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        *self.accepted.lock().unwrap() = Some(request.clone());
        Ok(())
    }

    fn surface(&self) -> Option<EngineSurface> {
        let accepted = self.accepted.lock().unwrap();
        let request = accepted.as_ref()?;

        let places: Option<Arc<dyn PlaceSearch>> =
            if request.capabilities.contains(&Capability::Places) {
                Some(Arc::new(HttpPlacesClient::new(
                    self.http_client.clone(),
                    self.config.search_base_url.clone(),
                    request.api_key.clone(),
                )))
            } else {
                None
            };
        let geometry = request.capabilities.contains(&Capability::Geometry);

        Some(EngineSurface::new(places, geometry))
    }
}
