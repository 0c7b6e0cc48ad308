//! Grid-based spatial clustering of delivery points.

use std::collections::HashMap;

use crate::models::Point;

/// Group points into square grid cells of `cell_size_deg` degrees.
///
/// Two points land in the same cluster iff their coordinates floor to the
/// same cell, so the result is deterministic for a given input order, and
/// clusters come back in first-seen order. Invalid points are dropped. A
/// non-positive or non-finite cell size collapses everything into a single
/// cluster.
pub fn cluster_by_grid(points: &[Point], cell_size_deg: f64) -> Vec<Vec<Point>> {
    let valid: Vec<Point> = points.iter().copied().filter(|p| p.is_valid()).collect();
    if valid.is_empty() {
        return Vec::new();
    }
    if !cell_size_deg.is_finite() || cell_size_deg <= 0.0 {
        return vec![valid];
    }

    let mut clusters: Vec<Vec<Point>> = Vec::new();
    let mut cell_index: HashMap<(i64, i64), usize> = HashMap::new();
    for point in valid {
        let cell = (
            (point.lon / cell_size_deg).floor() as i64,
            (point.lat / cell_size_deg).floor() as i64,
        );
        match cell_index.get(&cell) {
            Some(&slot) => clusters[slot].push(point),
            None => {
                cell_index.insert(cell, clusters.len());
                clusters.push(vec![point]);
            }
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_points_share_a_cluster() {
        let points = vec![
            Point::new(-117.00010, 33.00010),
            Point::new(-117.00020, 33.00020),
            Point::new(-117.10000, 33.10000),
        ];
        let clusters = cluster_by_grid(&points, 0.0015);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 1);
    }

    #[test]
    fn clusters_partition_the_valid_input() {
        let points = vec![
            Point::new(0.0001, 0.0001),
            Point::new(0.5, 0.5),
            Point::new(f64::NAN, 0.0),
            Point::new(0.0002, 0.0002),
        ];
        let clusters = cluster_by_grid(&points, 0.0015);
        let total: usize = clusters.iter().map(Vec::len).sum();
        assert_eq!(total, 3);
        assert!(clusters.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let points = vec![
            Point::new(10.0, 10.0),
            Point::new(-10.0, -10.0),
            Point::new(10.00001, 10.00001),
        ];
        let clusters = cluster_by_grid(&points, 0.0015);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0][0], Point::new(10.0, 10.0));
        assert_eq!(clusters[0][1], Point::new(10.00001, 10.00001));
        assert_eq!(clusters[1][0], Point::new(-10.0, -10.0));
    }

    #[test]
    fn degenerate_cell_size_yields_one_cluster() {
        let points = vec![Point::new(1.0, 1.0), Point::new(-50.0, 20.0)];
        assert_eq!(cluster_by_grid(&points, 0.0).len(), 1);
        assert_eq!(cluster_by_grid(&points, f64::NAN).len(), 1);
        assert_eq!(cluster_by_grid(&points, -0.1).len(), 1);
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        assert!(cluster_by_grid(&[], 0.0015).is_empty());
    }
}
