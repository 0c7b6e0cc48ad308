//! Server configuration loaded from environment variables.

use std::env;

/// Runtime configuration for the planning server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Base URL of the Valhalla routing engine.
    pub valhalla_url: String,
    /// Default Valhalla costing profile.
    pub profile: String,
    /// Grid cell size in degrees used to cluster nearby points.
    pub cell_size_deg: f64,
    /// Maximum improvement passes for the 2-opt refinement.
    pub two_opt_passes: usize,
    /// Road legs longer than this factor times the direct distance fall back to a straight line.
    pub detour_factor: f64,
    /// Legs shorter than this direct distance in meters skip the detour check.
    pub detour_min_m: f64,
    /// Largest stop count the whole-route refinement pass will attempt.
    pub global_opt_max_points: usize,
    /// Upper bound on concurrent requests to the routing engine.
    pub max_concurrent_calls: usize,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("DROPROUTE_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4000),
            valhalla_url: env::var("VALHALLA_URL")
                .unwrap_or_else(|_| "http://localhost:8888".to_string()),
            profile: env::var("DROPROUTE_PROFILE").unwrap_or_else(|_| "pedestrian".to_string()),
            cell_size_deg: env::var("DROPROUTE_CELL_SIZE_DEG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.0015),
            two_opt_passes: env::var("DROPROUTE_TSP_PASSES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            detour_factor: env::var("DROPROUTE_DETOUR_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3.0),
            detour_min_m: env::var("DROPROUTE_DETOUR_MIN_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50.0),
            global_opt_max_points: env::var("DROPROUTE_GLOBAL_OPT_MAX_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(75),
            max_concurrent_calls: env::var("DROPROUTE_MAX_CONCURRENT_CALLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
        }
    }
}
