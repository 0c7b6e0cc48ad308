//! HTTP API surface.

pub mod footprints;
pub mod routes;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Compose every API route group into one router.
pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
