//! Place-search provider abstraction
//!
//! This module provides the HTTP client seam and the concrete client for
//! the mapping engine's nearby-search capability. The [`PlaceSearch`]
//! trait is the surface the engine handle exposes to the orchestrator;
//! [`AsyncHttpClient`] keeps every remote fetch mockable in tests.

mod http;
mod places;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use places::HttpPlacesClient;
pub use types::{
    NearbyQuery, PlaceResult, PlaceSearch, ProviderError, SearchResponse, SearchStatus,
};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
