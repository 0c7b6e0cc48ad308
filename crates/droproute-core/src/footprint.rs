//! Building footprints and path-crossing checks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Point;

/// A building outline used as a routing obstacle.
///
/// Holds every ring of the source polygon. Holes count as boundaries too:
/// the crossing check looks for edge intersections, not containment, so a
/// path that stays strictly inside an outline does not register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub rings: Vec<Vec<Point>>,
}

impl Footprint {
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// True when any sub-segment of `path` crosses any ring edge.
    pub fn intersects_path(&self, path: &[Point]) -> bool {
        if path.len() < 2 {
            return false;
        }
        for ring in &self.rings {
            if ring.len() < 2 {
                continue;
            }
            for i in 0..ring.len() {
                let edge_a = ring[i];
                let edge_b = ring[(i + 1) % ring.len()];
                // Closed rings repeat their first vertex; skip the
                // degenerate wrap edge that produces.
                if edge_a.key() == edge_b.key() {
                    continue;
                }
                for hop in path.windows(2) {
                    if segments_cross(hop[0], hop[1], edge_a, edge_b) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// 2-D segment intersection on raw degree coordinates, touches included.
fn segments_cross(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    // Tolerance in degrees, sized to absorb floating-point error at
    // city-block coordinate spans.
    const EPS_DEG: f64 = 1e-12;

    fn orient(p: Point, q: Point, r: Point) -> f64 {
        (q.lon - p.lon) * (r.lat - p.lat) - (q.lat - p.lat) * (r.lon - p.lon)
    }

    fn within(a: f64, b: f64, value: f64) -> bool {
        let min = a.min(b) - EPS_DEG;
        let max = a.max(b) + EPS_DEG;
        value >= min && value <= max
    }

    fn on_segment(p: Point, q: Point, r: Point) -> bool {
        within(p.lon, q.lon, r.lon) && within(p.lat, q.lat, r.lat)
    }

    let o1 = orient(a1, a2, b1);
    let o2 = orient(a1, a2, b2);
    let o3 = orient(b1, b2, a1);
    let o4 = orient(b1, b2, a2);

    if o1.abs() <= EPS_DEG && on_segment(a1, a2, b1) {
        return true;
    }
    if o2.abs() <= EPS_DEG && on_segment(a1, a2, b2) {
        return true;
    }
    if o3.abs() <= EPS_DEG && on_segment(b1, b2, a1) {
        return true;
    }
    if o4.abs() <= EPS_DEG && on_segment(b1, b2, a2) {
        return true;
    }

    let a_crosses = (o1 > EPS_DEG && o2 < -EPS_DEG) || (o1 < -EPS_DEG && o2 > EPS_DEG);
    let b_crosses = (o3 > EPS_DEG && o4 < -EPS_DEG) || (o3 < -EPS_DEG && o4 > EPS_DEG);
    a_crosses && b_crosses
}

/// Result of importing a GeoJSON document.
#[derive(Debug, Default)]
pub struct GeojsonImport {
    pub footprints: Vec<Footprint>,
    /// Features and geometries that were present but not polygonal.
    pub skipped: usize,
}

/// Extract polygon footprints from a GeoJSON value.
///
/// Accepts a FeatureCollection, a single Feature, or a bare geometry.
/// Point and line geometries are counted in `skipped` rather than failing
/// the whole document. Imported footprints carry an empty id; the caller
/// assigns one.
pub fn footprints_from_geojson(value: &Value) -> GeojsonImport {
    let mut import = GeojsonImport::default();
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect_feature(feature, &mut import);
                }
            }
        }
        Some("Feature") => collect_feature(value, &mut import),
        Some(_) => collect_geometry(value, None, &mut import),
        None => import.skipped += 1,
    }
    import
}

fn collect_feature(feature: &Value, import: &mut GeojsonImport) {
    let name = feature
        .get("properties")
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    match feature.get("geometry") {
        Some(geometry) if !geometry.is_null() => collect_geometry(geometry, name, import),
        _ => import.skipped += 1,
    }
}

fn collect_geometry(geometry: &Value, name: Option<String>, import: &mut GeojsonImport) {
    let rings: Vec<Vec<Point>> = match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => geometry
            .get("coordinates")
            .map(polygon_rings)
            .unwrap_or_default(),
        Some("MultiPolygon") => geometry
            .get("coordinates")
            .and_then(Value::as_array)
            .map(|polygons| polygons.iter().flat_map(polygon_rings).collect())
            .unwrap_or_default(),
        _ => {
            import.skipped += 1;
            return;
        }
    };
    if rings.is_empty() {
        import.skipped += 1;
        return;
    }
    import.footprints.push(Footprint {
        id: String::new(),
        name,
        rings,
    });
}

/// Rings of one polygon coordinate array, invalid vertices dropped.
fn polygon_rings(coordinates: &Value) -> Vec<Vec<Point>> {
    let Some(rings) = coordinates.as_array() else {
        return Vec::new();
    };
    rings
        .iter()
        .filter_map(|ring| {
            let vertices: Vec<Point> = ring
                .as_array()?
                .iter()
                .filter_map(point_from_value)
                .filter(|p| p.is_valid())
                .collect();
            (vertices.len() >= 2).then_some(vertices)
        })
        .collect()
}

fn point_from_value(value: &Value) -> Option<Point> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    Some(Point::new(lon, lat))
}
