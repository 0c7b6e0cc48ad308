//! Route planning endpoint and router assembly.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};

use crate::api::footprints;
use crate::planner::{self, PlanRouteRequest, PlanRouteResponse};
use crate::state::AppState;

/// Build the API router with every endpoint group.
pub fn create_router() -> Router<Arc<AppState>> {
    let plan_routes = Router::new().route("/v1/routes/plan", post(plan_route_handler));

    let footprint_routes = Router::new()
        .route(
            "/v1/footprints",
            post(footprints::upload_footprints)
                .get(footprints::list_footprints)
                .delete(footprints::clear_footprints),
        )
        .route("/v1/footprints/:id", delete(footprints::delete_footprint));

    plan_routes.merge(footprint_routes)
}

/// Plan a delivery route for the posted points.
async fn plan_route_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanRouteRequest>,
) -> (StatusCode, Json<PlanRouteResponse>) {
    let response =
        planner::plan_route(state.as_ref(), state.valhalla(), state.config(), request).await;

    let status = if response.ok {
        StatusCode::OK
    } else if planner::is_superseded(&response) {
        StatusCode::CONFLICT
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(response))
}
