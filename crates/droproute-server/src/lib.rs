//! Shared library surface for the planning server modules and tests.

pub mod api;
pub mod config;
pub mod planner;
pub mod state;
