//! Interface to an external routing engine.

use std::future::Future;

use crate::error::ProviderError;
use crate::matrix::CostMatrix;
use crate::models::{Point, RouteLeg};

/// A routing engine that prices and draws travel between waypoints.
///
/// This is the planner's single external dependency and its most likely
/// partial-failure point. Callers treat every error as a degraded result
/// with a defined fallback: a failed matrix falls back to sequential
/// visiting order, a failed leg to a straight segment.
pub trait RouteProvider: Send + Sync {
    /// Full travel-cost matrix over `points`; row is the source, column
    /// the target. Unroutable pairs come back as `f64::INFINITY`.
    fn cost_matrix(
        &self,
        points: &[Point],
        profile: &str,
    ) -> impl Future<Output = Result<CostMatrix, ProviderError>> + Send;

    /// Road-following geometry and length for a single hop.
    fn route_leg(
        &self,
        from: Point,
        to: Point,
        profile: &str,
    ) -> impl Future<Output = Result<RouteLeg, ProviderError>> + Send;
}
