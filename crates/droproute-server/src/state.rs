//! Shared application state.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use droproute_core::Footprint;
use droproute_valhalla::ValhallaClient;

use crate::config::Config;

/// A footprint plus upload bookkeeping.
#[derive(Debug, Clone)]
pub struct StoredFootprint {
    pub footprint: Footprint,
    pub added_at: DateTime<Utc>,
}

/// Thread-safe state shared across request handlers.
pub struct AppState {
    config: Config,
    valhalla: ValhallaClient,
    footprints: DashMap<String, StoredFootprint>,
    plan_generation: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let valhalla = ValhallaClient::new(&config.valhalla_url);
        Self {
            config,
            valhalla,
            footprints: DashMap::new(),
            plan_generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn valhalla(&self) -> &ValhallaClient {
        &self.valhalla
    }

    /// Register the start of a plan request and return its generation number.
    ///
    /// The returned generation stays current until the next call, so an
    /// in-flight plan can detect that a newer request has superseded it.
    pub fn begin_plan(&self) -> u64 {
        self.plan_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `generation` still belongs to the newest plan request.
    pub fn plan_is_current(&self, generation: u64) -> bool {
        self.plan_generation.load(Ordering::SeqCst) == generation
    }

    pub fn add_footprint(&self, footprint: Footprint) {
        self.footprints.insert(
            footprint.id.clone(),
            StoredFootprint {
                footprint,
                added_at: Utc::now(),
            },
        );
    }

    /// Footprints without the bookkeeping, for the planner.
    pub fn footprints(&self) -> Vec<Footprint> {
        self.footprints
            .iter()
            .map(|entry| entry.value().footprint.clone())
            .collect()
    }

    pub fn stored_footprints(&self) -> Vec<StoredFootprint> {
        self.footprints
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn remove_footprint(&self, id: &str) -> bool {
        self.footprints.remove(id).is_some()
    }

    pub fn clear_footprints(&self) -> usize {
        let removed = self.footprints.len();
        self.footprints.clear();
        removed
    }
}
