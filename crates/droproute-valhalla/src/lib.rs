//! Valhalla routing engine client.
//!
//! Speaks the two endpoints the planner needs: travel-time matrices and
//! road-following route geometry.

pub mod client;
pub mod polyline;

pub use client::ValhallaClient;
pub use polyline::decode_polyline6;
