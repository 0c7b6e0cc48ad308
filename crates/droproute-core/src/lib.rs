pub mod cluster;
pub mod error;
pub mod footprint;
pub mod geometry;
pub mod matrix;
pub mod models;
pub mod provider;
pub mod tsp;

pub use cluster::cluster_by_grid;
pub use error::{PlanError, ProviderError};
pub use footprint::{footprints_from_geojson, Footprint, GeojsonImport};
pub use geometry::haversine_distance_m;
pub use matrix::CostMatrix;
pub use models::{Point, RouteLeg};
pub use provider::RouteProvider;
pub use tsp::{greedy_tour, tour_cost, two_opt};
