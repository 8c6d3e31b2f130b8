use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "HearMe Vitals";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Samples retained per session; older entries are evicted first.
pub const HISTORY_WINDOW: usize = 50;

/// Noise added to every range half-width per tick.
pub const NOISE_PER_TICK: f64 = 0.5;

/// Upper bound on the tick-driven noise.
pub const NOISE_CAP: f64 = 10.0;

/// Prior samples needed before the trend check runs.
pub const TREND_MIN_HISTORY: usize = 3;

/// Summaries returned per patient when no limit is given.
pub const SUMMARY_LIST_LIMIT: usize = 20;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

const ENV_BIND_ADDR: &str = "HEARME_BIND_ADDR";
const ENV_RNG_SEED: &str = "HEARME_RNG_SEED";

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "hearme_vitals=info,tower_http=warn"
}

/// Runtime configuration for the monitoring server.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub bind_addr: SocketAddr,
    /// Master seed for scenario choice and sample jitter. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl MonitorConfig {
    /// Read configuration from `HEARME_BIND_ADDR` and `HEARME_RNG_SEED`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(ENV_BIND_ADDR).ok().as_deref(),
            std::env::var(ENV_RNG_SEED).ok().as_deref(),
        )
    }

    /// Build from raw values. Anything unparseable falls back to the default.
    pub fn from_values(bind_addr: Option<&str>, rng_seed: Option<&str>) -> Self {
        let default_addr = default_bind_addr();

        let bind_addr = match bind_addr {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = raw, "Invalid {ENV_BIND_ADDR}, using default");
                default_addr
            }),
            None => default_addr,
        };

        let rng_seed = rng_seed.and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = raw, "Invalid {ENV_RNG_SEED}, seeding from entropy");
                None
            }
        });

        Self {
            bind_addr,
            rng_seed,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rng_seed: None,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
