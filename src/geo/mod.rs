//! Geographic math module
//!
//! Pure distance and containment primitives shared by the search ranking
//! and geofence evaluation paths: haversine great-circle distance and a
//! ray-casting point-in-polygon test.

mod types;

pub use types::{Coordinate, GeoError, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the haversine great-circle distance between two points, in km.
///
/// Deterministic and symmetric: `distance_km(a, b) == distance_km(b, a)`
/// and `distance_km(a, a) == 0.0`.
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat().to_radians();
    let lat_b = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Tests whether a point lies inside a single closed ring.
///
/// Ray-casting parity test with longitude as the x axis and latitude as
/// the y axis. Edge membership follows the half-open crossing rule: a
/// segment contributes a crossing when exactly one endpoint's latitude is
/// strictly greater than the point's. Rings with fewer than 3 vertices
/// contain nothing.
#[inline]
pub fn point_in_ring(p: Coordinate, ring: &[Coordinate]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (p.lng(), p.lat());
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = (ring[i].lng(), ring[i].lat());
        let (xj, yj) = (ring[j].lng(), ring[j].lat());

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Tests whether a point lies inside any of the given rings.
///
/// Disjoint rings representing the same zone are OR-combined: containment
/// in any single ring counts as containment in the zone.
pub fn point_in_polygon(p: Coordinate, rings: &[Vec<Coordinate>]) -> bool {
    rings.iter().any(|ring| point_in_ring(p, ring))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).expect("valid test coordinate")
    }

    fn square_ring() -> Vec<Coordinate> {
        vec![
            coord(0.0, 0.0),
            coord(10.0, 0.0),
            coord(10.0, 10.0),
            coord(0.0, 10.0),
            coord(0.0, 0.0),
        ]
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let points = [
            coord(0.0, 0.0),
            coord(13.0827, 80.2707),
            coord(-45.0, 170.0),
            coord(89.9, -179.9),
        ];
        for p in points {
            assert_eq!(distance_km(p, p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = coord(13.0827, 80.2707);
        let b = coord(51.5074, -0.1278);
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_triangle_inequality() {
        let a = coord(13.0827, 80.2707);
        let b = coord(51.5074, -0.1278);
        let c = coord(48.8566, 2.3522);
        assert!(distance_km(a, c) <= distance_km(a, b) + distance_km(b, c) + 1e-9);
    }

    #[test]
    fn test_distance_london_to_paris() {
        // Widely quoted great-circle distance is ~343.5 km
        let london = coord(51.5074, -0.1278);
        let paris = coord(48.8566, 2.3522);
        let d = distance_km(london, paris);
        assert!((d - 343.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_chennai_harbor() {
        // Chennai anchorage to a marina just offshore
        let origin = coord(13.0827, 80.2707);
        let marina = coord(13.10, 80.30);
        let d = distance_km(origin, marina);
        assert!((d - 3.711).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_point_inside_square() {
        let ring = square_ring();
        assert!(point_in_ring(coord(5.0, 5.0), &ring));
        assert!(point_in_ring(coord(0.001, 0.001), &ring));
        assert!(point_in_ring(coord(9.999, 9.999), &ring));
    }

    #[test]
    fn test_point_outside_square() {
        let ring = square_ring();
        assert!(!point_in_ring(coord(15.0, 5.0), &ring));
        assert!(!point_in_ring(coord(5.0, -1.0), &ring));
        assert!(!point_in_ring(coord(-5.0, -5.0), &ring));
        assert!(!point_in_ring(coord(10.5, 10.5), &ring));
    }

    #[test]
    fn test_containment_is_consistent_across_calls() {
        let ring = square_ring();
        let near_boundary = [coord(9.9999, 5.0), coord(5.0, 0.0001), coord(10.0, 5.0)];
        for p in near_boundary {
            let first = point_in_ring(p, &ring);
            for _ in 0..10 {
                assert_eq!(point_in_ring(p, &ring), first);
            }
        }
    }

    #[test]
    fn test_degenerate_ring_contains_nothing() {
        let line = vec![coord(0.0, 0.0), coord(10.0, 10.0)];
        assert!(!point_in_ring(coord(5.0, 5.0), &line));
        assert!(!point_in_polygon(coord(5.0, 5.0), &[]));
    }

    #[test]
    fn test_multiple_rings_or_combined() {
        let west = square_ring();
        let east: Vec<Coordinate> = vec![
            coord(0.0, 20.0),
            coord(10.0, 20.0),
            coord(10.0, 30.0),
            coord(0.0, 30.0),
            coord(0.0, 20.0),
        ];
        let rings = vec![west, east];

        assert!(point_in_polygon(coord(5.0, 5.0), &rings));
        assert!(point_in_polygon(coord(5.0, 25.0), &rings));
        assert!(!point_in_polygon(coord(5.0, 15.0), &rings));
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }
}
