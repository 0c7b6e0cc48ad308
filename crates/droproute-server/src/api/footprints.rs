//! Obstacle footprint endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use droproute_core::footprints_from_geojson;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FootprintSummary {
    pub id: String,
    pub name: Option<String>,
    pub ring_count: usize,
    pub vertex_count: usize,
    pub added_at: DateTime<Utc>,
}

/// Import polygon footprints from a GeoJSON document.
///
/// Accepts a FeatureCollection, a single Feature, or a bare geometry.
/// Non-polygon geometries are counted as skipped rather than rejected.
pub async fn upload_footprints(
    State(state): State<Arc<AppState>>,
    Json(document): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let import = footprints_from_geojson(&document);

    if import.footprints.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "No polygon features found",
                "hint": "Upload GeoJSON with Polygon or MultiPolygon geometries",
                "skipped": import.skipped,
            })),
        );
    }

    let added = import.footprints.len();
    for mut footprint in import.footprints {
        footprint.id = Uuid::new_v4().to_string();
        tracing::info!(
            "Added footprint '{}' ({})",
            footprint.name.as_deref().unwrap_or("unnamed"),
            footprint.id
        );
        state.add_footprint(footprint);
    }

    (
        StatusCode::CREATED,
        Json(json!({ "added": added, "skipped": import.skipped })),
    )
}

/// List stored footprints, oldest first.
pub async fn list_footprints(State(state): State<Arc<AppState>>) -> Json<Vec<FootprintSummary>> {
    let mut summaries: Vec<FootprintSummary> = state
        .stored_footprints()
        .into_iter()
        .map(|stored| FootprintSummary {
            id: stored.footprint.id.clone(),
            name: stored.footprint.name.clone(),
            ring_count: stored.footprint.rings.len(),
            vertex_count: stored.footprint.vertex_count(),
            added_at: stored.added_at,
        })
        .collect();
    summaries.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
    Json(summaries)
}

/// Remove one footprint by id.
pub async fn delete_footprint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.remove_footprint(&id) {
        tracing::info!("Removed footprint {}", id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Remove every stored footprint.
pub async fn clear_footprints(State(state): State<Arc<AppState>>) -> Json<Value> {
    let removed = state.clear_footprints();
    tracing::info!("Cleared {} footprints", removed);
    Json(json!({ "removed": removed }))
}
