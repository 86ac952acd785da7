//! Session configuration.
//!
//! Composes the per-component configurations into one value handed to
//! the session facade. All configuration is in-memory; nothing is read
//! from or persisted to disk.

use crate::boundary::BoundaryConfig;
use crate::engine::EngineConfig;
use crate::location::LocationConfig;
use crate::search::SearchConfig;

/// Top-level session configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Location acquisition settings.
    pub location: LocationConfig,
    /// Engine loader settings.
    pub engine: EngineConfig,
    /// Boundary store settings.
    pub boundary: BoundaryConfig,
    /// Search orchestration settings.
    pub search: SearchConfig,
}

impl SessionConfig {
    /// Sets the engine API credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.engine.api_key = Some(api_key.into());
        self
    }

    /// Replaces the location settings.
    pub fn with_location(mut self, location: LocationConfig) -> Self {
        self.location = location;
        self
    }

    /// Replaces the engine settings.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Replaces the boundary settings.
    pub fn with_boundary(mut self, boundary: BoundaryConfig) -> Self {
        self.boundary = boundary;
        self
    }

    /// Replaces the search settings.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }
}
