//! Core data types shared across the planning crates.

use serde::{Deserialize, Serialize};

use crate::geometry;

/// A geographic coordinate, GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Build from the `[lon, lat]` pair used on the wire.
    pub fn from_lonlat(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }

    pub fn to_lonlat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Both components finite. Invalid points are dropped at the boundary
    /// and never reach a solver or a routing engine.
    pub fn is_valid(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Bit-exact coordinate key for deduplication.
    pub fn key(self) -> (u64, u64) {
        (self.lon.to_bits(), self.lat.to_bits())
    }
}

/// A road-following leg between two waypoints, as returned by a routing
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLeg {
    pub path: Vec<Point>,
    pub distance_m: f64,
    pub time_s: f64,
}

impl RouteLeg {
    /// Straight connection used when road routing is unavailable or the
    /// engine's answer was rejected. Travel time is unknown and reported
    /// as zero.
    pub fn straight(from: Point, to: Point) -> Self {
        Self {
            path: vec![from, to],
            distance_m: geometry::haversine_distance_m(from, to),
            time_s: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_validity_rejects_non_finite_components() {
        assert!(Point::new(-117.8265, 33.6846).is_valid());
        assert!(!Point::new(f64::NAN, 33.0).is_valid());
        assert!(!Point::new(-117.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn lonlat_round_trip_preserves_order() {
        let point = Point::from_lonlat([-117.8265, 33.6846]);
        assert_eq!(point.lon, -117.8265);
        assert_eq!(point.lat, 33.6846);
        assert_eq!(point.to_lonlat(), [-117.8265, 33.6846]);
    }

    #[test]
    fn straight_leg_spans_its_endpoints() {
        let a = Point::new(-117.0, 33.0);
        let b = Point::new(-117.0, 33.001);
        let leg = RouteLeg::straight(a, b);
        assert_eq!(leg.path.len(), 2);
        assert!(leg.distance_m > 100.0 && leg.distance_m < 120.0);
    }
}
