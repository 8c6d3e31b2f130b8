//! Process-wide application state.
//!
//! `CoreState` is built once at startup, wrapped in `Arc`, and shared by
//! every transport. All mutable state lives inside `MonitoringService`,
//! which guards it with its own locks.

use std::time::Instant;

use crate::config::MonitorConfig;
use crate::monitoring::MonitoringService;

pub struct CoreState {
    pub monitoring: MonitoringService,
    started: Instant,
}

impl CoreState {
    /// Create state seeded from entropy.
    pub fn new() -> Self {
        Self::with_service(MonitoringService::new())
    }

    /// Create state from runtime configuration.
    pub fn from_config(config: &MonitorConfig) -> Self {
        let service = match config.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using fixed RNG seed");
                MonitoringService::with_seed(seed)
            }
            None => MonitoringService::new(),
        };
        Self::with_service(service)
    }

    pub fn with_service(monitoring: MonitoringService) -> Self {
        Self {
            monitoring,
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}
