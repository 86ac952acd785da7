//! Boundary polygon types and feature-collection parsing.

use crate::geo::{self, Coordinate};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur loading the boundary dataset.
///
/// These never escape the boundary store; every variant degrades to an
/// absent boundary for the session.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Body did not parse as a feature collection.
    #[error("Failed to parse feature collection: {0}")]
    Parse(String),

    /// Body parsed but is not a feature collection.
    #[error("Expected a FeatureCollection, got '{0}'")]
    NotFeatureCollection(String),

    /// Feature collection carries no features.
    #[error("Feature collection contains no features")]
    EmptyCollection,

    /// No feature carried a usable polygon geometry.
    #[error("No usable polygon geometry in any feature")]
    NoUsableGeometry,
}

/// A maritime boundary zone: one or more closed rings plus metadata.
///
/// Loaded once per session by the boundary store and shared read-only
/// with the crossing monitor.
#[derive(Debug, Clone)]
pub struct BoundaryPolygon {
    /// Display name of the zone.
    pub name: String,
    /// Territory the zone belongs to.
    pub territory: String,
    /// Zone area in square kilometers, when the dataset provides it.
    pub area_km2: Option<f64>,
    /// Closed rings; disjoint rings represent the same zone.
    rings: Vec<Vec<Coordinate>>,
}

impl BoundaryPolygon {
    /// Tests whether a point lies inside the zone.
    pub fn contains(&self, p: Coordinate) -> bool {
        geo::point_in_polygon(p, &self.rings)
    }

    /// Number of rings in the zone.
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Parses a GeoJSON-like feature collection body into a polygon.
    ///
    /// Strict about shape: the body must be a `FeatureCollection` with at
    /// least one feature, and at least one feature must carry a `Polygon`
    /// or `MultiPolygon` geometry. Rings containing an out-of-range
    /// position are dropped with a warning.
    ///
    /// Metadata is taken from the first feature with properties; rings are
    /// collected across all features, since a region filter can split one
    /// zone over several features.
    pub fn from_feature_collection(body: &[u8]) -> Result<Self, BoundaryError> {
        let raw: RawFeatureCollection = serde_json::from_slice(body)
            .map_err(|e| BoundaryError::Parse(e.to_string()))?;

        if raw.kind != "FeatureCollection" {
            return Err(BoundaryError::NotFeatureCollection(raw.kind));
        }
        if raw.features.is_empty() {
            return Err(BoundaryError::EmptyCollection);
        }

        let mut name = None;
        let mut territory = None;
        let mut area_km2 = None;
        let mut rings = Vec::new();

        for feature in raw.features {
            if let Some(props) = feature.properties {
                name = name.or(props.geoname);
                territory = territory.or(props.territory1);
                area_km2 = area_km2.or(props.area_km2);
            }
            if let Some(geometry) = feature.geometry {
                rings.extend(geometry.into_rings());
            }
        }

        if rings.is_empty() {
            return Err(BoundaryError::NoUsableGeometry);
        }

        Ok(Self {
            name: name.unwrap_or_else(|| "Exclusive Economic Zone".to_string()),
            territory: territory.unwrap_or_default(),
            area_km2,
            rings,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_rings(name: &str, rings: Vec<Vec<Coordinate>>) -> Self {
        Self {
            name: name.to_string(),
            territory: String::new(),
            area_km2: None,
            rings,
        }
    }
}

/// Wire format of the feature-data service response.
#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    properties: Option<RawProperties>,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    geoname: Option<String>,
    territory1: Option<String>,
    area_km2: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

impl RawGeometry {
    /// Converts the geometry into coordinate rings.
    ///
    /// GeoJSON positions are `[lng, lat]` ordered; a position may carry a
    /// trailing altitude component, which is ignored.
    fn into_rings(self) -> Vec<Vec<Coordinate>> {
        match self.kind.as_str() {
            "Polygon" => match serde_json::from_value::<Vec<Vec<Vec<f64>>>>(self.coordinates) {
                Ok(polygon) => polygon.into_iter().filter_map(parse_ring).collect(),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed Polygon geometry");
                    Vec::new()
                }
            },
            "MultiPolygon" => {
                match serde_json::from_value::<Vec<Vec<Vec<Vec<f64>>>>>(self.coordinates) {
                    Ok(polygons) => polygons
                        .into_iter()
                        .flatten()
                        .filter_map(parse_ring)
                        .collect(),
                    Err(e) => {
                        warn!(error = %e, "Skipping malformed MultiPolygon geometry");
                        Vec::new()
                    }
                }
            }
            other => {
                warn!(kind = other, "Skipping unsupported geometry type");
                Vec::new()
            }
        }
    }
}

/// Parses one ring of `[lng, lat, ...]` positions, dropping the ring when
/// any position is unusable.
fn parse_ring(positions: Vec<Vec<f64>>) -> Option<Vec<Coordinate>> {
    let mut ring = Vec::with_capacity(positions.len());
    for position in &positions {
        let (&lng, &lat) = match (position.first(), position.get(1)) {
            (Some(lng), Some(lat)) => (lng, lat),
            _ => {
                warn!("Dropping ring with truncated position");
                return None;
            }
        };
        match Coordinate::new(lat, lng) {
            Ok(c) => ring.push(c),
            Err(e) => {
                warn!(error = %e, "Dropping ring with out-of-range position");
                return None;
            }
        }
    }
    Some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_FEATURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "properties": {
                "geoname": "Indian Exclusive Economic Zone",
                "territory1": "India",
                "area_km2": 2305143.0
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[80.0, 12.0], [82.0, 12.0], [82.0, 14.0], [80.0, 14.0], [80.0, 12.0]]]
            }
        }]
    }"#;

    #[test]
    fn test_parses_single_polygon_feature() {
        let polygon = BoundaryPolygon::from_feature_collection(ONE_FEATURE.as_bytes()).unwrap();
        assert_eq!(polygon.name, "Indian Exclusive Economic Zone");
        assert_eq!(polygon.territory, "India");
        assert_eq!(polygon.area_km2, Some(2305143.0));
        assert_eq!(polygon.ring_count(), 1);

        let inside = Coordinate::new(13.0, 81.0).unwrap();
        let outside = Coordinate::new(15.0, 81.0).unwrap();
        assert!(polygon.contains(inside));
        assert!(!polygon.contains(outside));
    }

    #[test]
    fn test_multipolygon_rings_or_combined() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                        [[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0], [5.0, 5.0]]]
                    ]
                }
            }]
        }"#;
        let polygon = BoundaryPolygon::from_feature_collection(body.as_bytes()).unwrap();
        assert_eq!(polygon.ring_count(), 2);
        assert!(polygon.contains(Coordinate::new(0.5, 0.5).unwrap()));
        assert!(polygon.contains(Coordinate::new(5.5, 5.5).unwrap()));
        assert!(!polygon.contains(Coordinate::new(3.0, 3.0).unwrap()));
    }

    #[test]
    fn test_rejects_non_feature_collection() {
        let body = r#"{"type": "Feature", "features": [{}]}"#;
        assert!(matches!(
            BoundaryPolygon::from_feature_collection(body.as_bytes()),
            Err(BoundaryError::NotFeatureCollection(_))
        ));
    }

    #[test]
    fn test_rejects_empty_collection() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(
            BoundaryPolygon::from_feature_collection(body.as_bytes()),
            Err(BoundaryError::EmptyCollection)
        ));
    }

    #[test]
    fn test_rejects_malformed_body() {
        assert!(matches!(
            BoundaryPolygon::from_feature_collection(b"<html>502</html>"),
            Err(BoundaryError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_feature_without_geometry() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{"properties": {"geoname": "Zone"}}]
        }"#;
        assert!(matches!(
            BoundaryPolygon::from_feature_collection(body.as_bytes()),
            Err(BoundaryError::NoUsableGeometry)
        ));
    }

    #[test]
    fn test_out_of_range_ring_is_dropped() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[200.0, 95.0], [201.0, 95.0], [201.0, 96.0], [200.0, 95.0]]]
                }
            }]
        }"#;
        assert!(matches!(
            BoundaryPolygon::from_feature_collection(body.as_bytes()),
            Err(BoundaryError::NoUsableGeometry)
        ));
    }
}
