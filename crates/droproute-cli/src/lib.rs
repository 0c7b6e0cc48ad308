//! Command line tools for the droproute planning server.
//!
//! This crate provides two binaries:
//! - plan_route: request a route plan for a set of points
//! - load_footprints: upload obstacle footprints from a GeoJSON file

pub mod client;

pub use client::RouteServerClient;
