//! Engine capability surface and handle.

use crate::provider::PlaceSearch;
use std::fmt;
use std::sync::Arc;

/// Capabilities that can be requested from the mapping engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Nearby place search.
    Places,
    /// Client-side geometry helpers.
    Geometry,
}

impl Capability {
    /// Wire name of the capability, as the engine load request expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Places => "places",
            Capability::Geometry => "geometry",
        }
    }
}

/// The engine's API surface once its load signal has fired and the
/// surface has attached.
///
/// Individual capabilities may still be absent (e.g. the credential is not
/// entitled to place search); consumers must check rather than assume.
#[derive(Clone)]
pub struct EngineSurface {
    places: Option<Arc<dyn PlaceSearch>>,
    geometry: bool,
}

impl EngineSurface {
    /// Creates a surface from its attached capabilities.
    pub fn new(places: Option<Arc<dyn PlaceSearch>>, geometry: bool) -> Self {
        Self { places, geometry }
    }

    /// The place-search capability, when attached.
    pub fn places(&self) -> Option<Arc<dyn PlaceSearch>> {
        self.places.clone()
    }

    /// True when geometry helpers are attached.
    pub fn geometry(&self) -> bool {
        self.geometry
    }
}

impl fmt::Debug for EngineSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSurface")
            .field("places", &self.places.is_some())
            .field("geometry", &self.geometry)
            .finish()
    }
}

/// Handle to a ready engine.
///
/// Cheap to clone; all clones share the same underlying surface. Held by
/// the session facade and passed to the search orchestrator.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    surface: EngineSurface,
}

impl EngineHandle {
    /// Wraps an attached surface.
    pub fn new(surface: EngineSurface) -> Self {
        Self { surface }
    }

    /// The place-search capability, when the engine exposes it.
    pub fn places(&self) -> Option<Arc<dyn PlaceSearch>> {
        self.surface.places()
    }

    /// True when geometry helpers are available.
    pub fn has_geometry(&self) -> bool {
        self.surface.geometry()
    }
}
