//! Seamark - Nearby maritime POI discovery and EEZ geofence monitoring
//!
//! This library provides the core pipeline for a marine safety/fishing
//! application: it acquires the user's position, loads an exclusive economic
//! zone boundary dataset, brings up an external mapping/search engine, then
//! discovers nearby maritime infrastructure (marinas, bait shops, safety
//! stations, ports, charters, ramps) and watches for geofence crossings.
//!
//! # High-Level API
//!
//! For most use cases, the [`session`] module provides a simplified facade:
//!
//! ```ignore
//! use seamark::config::SessionConfig;
//! use seamark::session::SeamarkSession;
//!
//! let config = SessionConfig::default().with_api_key("YOUR_API_KEY");
//! let session = SeamarkSession::new(config, position, transport, boundary);
//!
//! session.start().await;
//! let pois = session.ranked_pois().await;
//! ```
//!
//! Initialization runs three independent async operations concurrently
//! (position fix, boundary fetch, engine load); a readiness gate opens once
//! all three have settled, after which the search orchestrator and the
//! boundary monitor start.

pub mod boundary;
pub mod config;
pub mod engine;
pub mod geo;
pub mod location;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod provider;
pub mod search;
pub mod session;

/// Version of the Seamark library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
