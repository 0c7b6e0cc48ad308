//! Hierarchical route planner.
//!
//! Clusters delivery points on a degree grid, orders each cluster and the
//! cluster centroids with travel-time matrices, then fetches street-level
//! legs between waypoints. Routing engine failures degrade the plan to
//! input order or straight lines instead of failing it.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use droproute_core::geometry::{
    bearing_deg, bearing_diff_deg, centroid, midpoint, orient_toward, planar_distance,
};
use droproute_core::{
    cluster_by_grid, greedy_tour, haversine_distance_m, two_opt, PlanError, Point, ProviderError,
    RouteLeg, RouteProvider,
};

use crate::config::Config;
use crate::state::AppState;

/// Sub-segments with a planar length below this get no direction arrow.
const MIN_ARROW_SUBSEGMENT_DEG: f64 = 1e-6;
/// Heading-swing band that counts as a U-turn, exclusive on both ends.
const U_TURN_MIN_DEG: f64 = 150.0;
const U_TURN_MAX_DEG: f64 = 210.0;
/// Extra 2-opt passes granted to the whole-route refinement.
const GLOBAL_REFINE_EXTRA_PASSES: usize = 2;

/// Which waypoints the street-level legs connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreetWaypointMode {
    /// One waypoint per cluster, in cluster visiting order.
    #[default]
    Centroids,
    /// Every point of the final sequence.
    Detailed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRouteRequest {
    /// Delivery points as `[lon, lat]` pairs.
    pub points: Vec<[f64; 2]>,
    pub cell_size_deg: Option<f64>,
    pub two_opt_passes: Option<usize>,
    /// `false` keeps the greedy construction order unrefined.
    pub use_two_opt: Option<bool>,
    pub profile: Option<String>,
    pub detour_factor: Option<f64>,
    pub detour_min_m: Option<f64>,
    pub global_refine: Option<bool>,
    pub street_waypoints: Option<StreetWaypointMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentSource {
    Road,
    Straight,
}

/// One drawable piece of the street-level route.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSegment {
    pub path: Vec<[f64; 2]>,
    pub length_m: f64,
    pub source: SegmentSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanArrow {
    pub at: [f64; 2],
    pub bearing_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanTurnHint {
    pub at: [f64; 2],
    pub angle_deg: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanStats {
    pub point_count: usize,
    pub dropped_points: usize,
    pub cluster_count: usize,
    pub road_length_m: f64,
    pub straight_fallbacks: usize,
    pub dropped_segments: usize,
    pub provider_failures: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanRouteResponse {
    pub ok: bool,
    /// Ordered unique points, the vertices of the schematic polyline.
    pub visit_order: Vec<[f64; 2]>,
    pub segments: Vec<PlanSegment>,
    pub arrows: Vec<PlanArrow>,
    pub turn_hints: Vec<PlanTurnHint>,
    pub stats: Option<PlanStats>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl PlanRouteResponse {
    fn failed(message: String) -> Self {
        Self {
            ok: false,
            visit_order: Vec::new(),
            segments: Vec::new(),
            arrows: Vec::new(),
            turn_hints: Vec::new(),
            stats: None,
            warnings: Vec::new(),
            errors: vec![message],
        }
    }

    fn superseded() -> Self {
        Self::failed("superseded by a newer plan request".to_string())
    }
}

/// Whether a failed response reports the plan as superseded.
pub fn is_superseded(response: &PlanRouteResponse) -> bool {
    response.errors.iter().any(|err| err.contains("superseded"))
}

/// Plan a visiting order and street-level route for a set of points.
pub async fn plan_route<P: RouteProvider>(
    state: &AppState,
    provider: &P,
    config: &Config,
    request: PlanRouteRequest,
) -> PlanRouteResponse {
    let generation = state.begin_plan();

    let cell_size = request.cell_size_deg.unwrap_or(config.cell_size_deg);
    let passes = request.two_opt_passes.unwrap_or(config.two_opt_passes);
    let refine = request.use_two_opt.unwrap_or(true);
    let profile = request
        .profile
        .clone()
        .unwrap_or_else(|| config.profile.clone());
    let detour_factor = request.detour_factor.unwrap_or(config.detour_factor);
    let detour_min_m = request.detour_min_m.unwrap_or(config.detour_min_m);
    let global_refine = request.global_refine.unwrap_or(true);
    let street_mode = request.street_waypoints.unwrap_or_default();
    let concurrency = config.max_concurrent_calls.max(1);

    let mut warnings: Vec<String> = Vec::new();
    let mut stats = PlanStats::default();

    // Validate and collapse exact duplicates, first occurrence wins.
    let mut unique: Vec<Point> = Vec::new();
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    let mut duplicates = 0usize;
    for pair in &request.points {
        let point = Point::from_lonlat(*pair);
        if !point.is_valid() {
            stats.dropped_points += 1;
            continue;
        }
        if seen.insert(point.key()) {
            unique.push(point);
        } else {
            duplicates += 1;
        }
    }
    stats.point_count = unique.len();
    if stats.dropped_points > 0 {
        warnings.push(format!(
            "dropped {} points with non-finite coordinates",
            stats.dropped_points
        ));
    }
    if duplicates > 0 {
        warnings.push(format!("collapsed {} duplicate points", duplicates));
    }

    if unique.len() < 2 {
        return PlanRouteResponse::failed(
            PlanError::InsufficientPoints {
                found: unique.len(),
            }
            .to_string(),
        );
    }

    let clusters = cluster_by_grid(&unique, cell_size);
    stats.cluster_count = clusters.len();
    tracing::info!(
        "Planning a route over {} points in {} clusters",
        unique.len(),
        clusters.len()
    );

    // Order the points inside each cluster, a few clusters at a time.
    let solves: Vec<ClusterSolve> = stream::iter(clusters)
        .map(|cluster| {
            let profile = profile.clone();
            async move { solve_cluster(provider, &cluster, &profile, refine, passes).await }
        })
        .buffered(concurrency)
        .collect()
        .await;
    if !state.plan_is_current(generation) {
        tracing::warn!("Plan superseded during cluster solving, abandoning it");
        return PlanRouteResponse::superseded();
    }

    let mut ordered_clusters: Vec<Vec<Point>> = Vec::with_capacity(solves.len());
    for (index, solve) in solves.into_iter().enumerate() {
        if solve.provider_failed {
            stats.provider_failures += 1;
            warnings.push(format!(
                "cluster {} kept input order after an engine failure",
                index
            ));
        }
        ordered_clusters.push(solve.ordered);
    }

    // Order the clusters themselves by their centroids.
    let centroids: Vec<Point> = ordered_clusters
        .iter()
        .filter_map(|cluster| centroid(cluster))
        .collect();
    let cluster_order: Vec<usize> = if centroids.len() < 2 {
        (0..ordered_clusters.len()).collect()
    } else {
        match provider.cost_matrix(&centroids, &profile).await {
            Ok(matrix) if matrix.size() == centroids.len() => {
                let mut order = greedy_tour(&matrix);
                if refine {
                    order = two_opt(order, &matrix, passes);
                }
                order
            }
            Ok(matrix) => {
                tracing::warn!(
                    "Centroid matrix size {} does not match cluster count {}, keeping cluster order",
                    matrix.size(),
                    centroids.len()
                );
                stats.provider_failures += 1;
                warnings.push("clusters kept input order after an engine failure".to_string());
                (0..centroids.len()).collect()
            }
            Err(err) => {
                tracing::warn!("Centroid matrix failed, keeping cluster order: {}", err);
                stats.provider_failures += 1;
                warnings.push("clusters kept input order after an engine failure".to_string());
                (0..centroids.len()).collect()
            }
        }
    };
    if !state.plan_is_current(generation) {
        tracing::warn!("Plan superseded during centroid solving, abandoning it");
        return PlanRouteResponse::superseded();
    }

    // Stitch the clusters together and collapse duplicates once more.
    let mut sequence: Vec<Point> = Vec::with_capacity(unique.len());
    let mut stitched: HashSet<(u64, u64)> = HashSet::new();
    for &cluster_index in &cluster_order {
        for &point in &ordered_clusters[cluster_index] {
            if stitched.insert(point.key()) {
                sequence.push(point);
            }
        }
    }

    // One more 2-opt over the whole sequence, when it stays affordable.
    if refine && global_refine && sequence.len() >= 3 {
        if sequence.len() <= config.global_opt_max_points {
            match provider.cost_matrix(&sequence, &profile).await {
                Ok(matrix) if matrix.size() == sequence.len() => {
                    let identity: Vec<usize> = (0..sequence.len()).collect();
                    let refined = two_opt(identity, &matrix, passes + GLOBAL_REFINE_EXTRA_PASSES);
                    let reordered: Vec<Point> =
                        refined.into_iter().map(|i| sequence[i]).collect();
                    sequence = reordered;
                }
                Ok(matrix) => {
                    tracing::warn!(
                        "Whole-route matrix size {} does not match stop count {}, keeping the stitched order",
                        matrix.size(),
                        sequence.len()
                    );
                    stats.provider_failures += 1;
                    warnings
                        .push("whole-route refinement skipped after an engine failure".to_string());
                }
                Err(err) => {
                    tracing::warn!(
                        "Whole-route matrix failed, keeping the stitched order: {}",
                        err
                    );
                    stats.provider_failures += 1;
                    warnings
                        .push("whole-route refinement skipped after an engine failure".to_string());
                }
            }
            if !state.plan_is_current(generation) {
                tracing::warn!("Plan superseded during whole-route refinement, abandoning it");
                return PlanRouteResponse::superseded();
            }
        } else {
            tracing::info!(
                "Skipping whole-route refinement for {} points (limit {})",
                sequence.len(),
                config.global_opt_max_points
            );
            warnings.push(format!(
                "whole-route refinement skipped for {} points",
                sequence.len()
            ));
        }
    }

    // Street-level waypoints: one per cluster or the full sequence.
    let street_waypoints: Vec<Point> = match street_mode {
        StreetWaypointMode::Centroids => cluster_order.iter().map(|&i| centroids[i]).collect(),
        StreetWaypointMode::Detailed => sequence.clone(),
    };

    // Fetch a road leg per consecutive waypoint pair, bounded concurrency,
    // results back in tour order.
    let pairs: Vec<(Point, Point)> = street_waypoints
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();
    let legs: Vec<Result<RouteLeg, ProviderError>> = stream::iter(pairs.iter().copied())
        .map(|(from, to)| {
            let profile = profile.clone();
            async move { provider.route_leg(from, to, &profile).await }
        })
        .buffered(concurrency)
        .collect()
        .await;
    if !state.plan_is_current(generation) {
        tracing::warn!("Plan superseded during street routing, abandoning it");
        return PlanRouteResponse::superseded();
    }

    let footprints = state.footprints();
    let mut segments: Vec<PlanSegment> = Vec::new();
    for (index, (&(from, to), result)) in pairs.iter().zip(legs).enumerate() {
        let direct_m = haversine_distance_m(from, to);
        let (leg, source) = match result {
            Ok(leg) => {
                if direct_m > detour_min_m && leg.distance_m > detour_factor * direct_m {
                    tracing::warn!(
                        "Leg {} rides {:.0} m of road for {:.0} m direct, drawing it straight",
                        index,
                        leg.distance_m,
                        direct_m
                    );
                    stats.straight_fallbacks += 1;
                    (RouteLeg::straight(from, to), SegmentSource::Straight)
                } else {
                    (leg, SegmentSource::Road)
                }
            }
            Err(err) => {
                tracing::warn!(
                    "Street routing for leg {} failed, drawing it straight: {}",
                    index,
                    err
                );
                stats.provider_failures += 1;
                stats.straight_fallbacks += 1;
                (RouteLeg::straight(from, to), SegmentSource::Straight)
            }
        };

        let path = orient_toward(&leg.path, from, to);
        if let Some(blocker) = footprints.iter().find(|fp| fp.intersects_path(&path)) {
            tracing::warn!(
                "Leg {} crosses footprint '{}', leaving a gap in the drawn route",
                index,
                blocker.name.as_deref().unwrap_or(&blocker.id)
            );
            stats.dropped_segments += 1;
            warnings.push(format!(
                "segment {} dropped, it crosses a stored footprint",
                index
            ));
            continue;
        }

        stats.road_length_m += leg.distance_m;
        segments.push(PlanSegment {
            path: path.iter().map(|p| p.to_lonlat()).collect(),
            length_m: leg.distance_m,
            source,
        });
    }

    // A direction arrow at the midpoint of every usable sub-segment.
    let mut arrows: Vec<PlanArrow> = Vec::new();
    for segment in &segments {
        for pair in segment.path.windows(2) {
            let a = Point::from_lonlat(pair[0]);
            let b = Point::from_lonlat(pair[1]);
            if planar_distance(a, b) < MIN_ARROW_SUBSEGMENT_DEG {
                continue;
            }
            arrows.push(PlanArrow {
                at: midpoint(a, b).to_lonlat(),
                bearing_deg: bearing_deg(a, b),
            });
        }
    }

    // Flag interior waypoints where the heading roughly reverses.
    let mut turn_hints: Vec<PlanTurnHint> = Vec::new();
    for window in street_waypoints.windows(3) {
        let inbound = bearing_deg(window[0], window[1]);
        let outbound = bearing_deg(window[1], window[2]);
        let swing = (outbound - inbound).abs();
        if swing > U_TURN_MIN_DEG && swing < U_TURN_MAX_DEG {
            turn_hints.push(PlanTurnHint {
                at: window[1].to_lonlat(),
                angle_deg: bearing_diff_deg(inbound, outbound),
            });
        }
    }

    if !state.plan_is_current(generation) {
        tracing::warn!("Plan superseded during assembly, abandoning it");
        return PlanRouteResponse::superseded();
    }

    tracing::info!(
        "Planned {} stops into {} drawn segments ({} straight, {} dropped)",
        sequence.len(),
        segments.len(),
        stats.straight_fallbacks,
        stats.dropped_segments
    );

    PlanRouteResponse {
        ok: true,
        visit_order: sequence.iter().map(|p| p.to_lonlat()).collect(),
        segments,
        arrows,
        turn_hints,
        stats: Some(stats),
        warnings,
        errors: Vec::new(),
    }
}

struct ClusterSolve {
    ordered: Vec<Point>,
    provider_failed: bool,
}

/// Order the points of one cluster with a travel-time matrix.
///
/// Falls back to the input order when the matrix cannot be fetched.
async fn solve_cluster<P: RouteProvider>(
    provider: &P,
    cluster: &[Point],
    profile: &str,
    refine: bool,
    passes: usize,
) -> ClusterSolve {
    if cluster.len() < 2 {
        return ClusterSolve {
            ordered: cluster.to_vec(),
            provider_failed: false,
        };
    }
    match provider.cost_matrix(cluster, profile).await {
        Ok(matrix) if matrix.size() == cluster.len() => {
            let mut order = greedy_tour(&matrix);
            if refine {
                order = two_opt(order, &matrix, passes);
            }
            ClusterSolve {
                ordered: order.into_iter().map(|i| cluster[i]).collect(),
                provider_failed: false,
            }
        }
        Ok(matrix) => {
            tracing::warn!(
                "Cluster matrix size {} does not match point count {}, keeping input order",
                matrix.size(),
                cluster.len()
            );
            ClusterSolve {
                ordered: cluster.to_vec(),
                provider_failed: true,
            }
        }
        Err(err) => {
            tracing::warn!("Cluster matrix failed, keeping input order: {}", err);
            ClusterSolve {
                ordered: cluster.to_vec(),
                provider_failed: true,
            }
        }
    }
}
