//! Geographic math for distances, bearings, and display geometry.

use crate::models::Point;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine).
pub fn haversine_distance_m(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial compass bearing from `a` to `b`, degrees in [0, 360).
///
/// Returns 0.0 for invalid or coincident inputs.
pub fn bearing_deg(a: Point, b: Point) -> f64 {
    if !a.is_valid() || !b.is_valid() {
        return 0.0;
    }
    if a.lon == b.lon && a.lat == b.lat {
        return 0.0;
    }
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Absolute difference between two bearings, folded into [0, 180].
pub fn bearing_diff_deg(first_deg: f64, second_deg: f64) -> f64 {
    let diff = (second_deg - first_deg).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Euclidean distance on raw degree coordinates.
///
/// Only useful for comparisons between nearby candidates; never mix the
/// result with meter-valued distances.
pub fn planar_distance(a: Point, b: Point) -> f64 {
    let dx = b.lon - a.lon;
    let dy = b.lat - a.lat;
    (dx * dx + dy * dy).sqrt()
}

/// Arithmetic midpoint of a short sub-segment.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.lon + b.lon) / 2.0, (a.lat + b.lat) / 2.0)
}

/// Mean position of the valid points, or `None` when there are none.
pub fn centroid(points: &[Point]) -> Option<Point> {
    let mut sum_lon = 0.0;
    let mut sum_lat = 0.0;
    let mut count = 0usize;
    for point in points {
        if !point.is_valid() {
            continue;
        }
        sum_lon += point.lon;
        sum_lat += point.lat;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Point::new(sum_lon / count as f64, sum_lat / count as f64))
}

/// Orient a leg polyline so it runs from `a` toward `b`.
///
/// Routing engines occasionally hand back geometry in the opposite
/// direction; comparing summed endpoint distances detects that. A
/// degenerate polyline is replaced by the straight connection.
pub fn orient_toward(line: &[Point], a: Point, b: Point) -> Vec<Point> {
    if line.len() < 2 {
        return vec![a, b];
    }
    let start = line[0];
    let end = line[line.len() - 1];
    let forward = planar_distance(start, a) + planar_distance(end, b);
    let backward = planar_distance(start, b) + planar_distance(end, a);
    if backward < forward {
        let mut flipped = line.to_vec();
        flipped.reverse();
        flipped
    } else {
        line.to_vec()
    }
}
