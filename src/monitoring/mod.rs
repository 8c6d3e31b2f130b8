//! Vitals monitoring engine.
//!
//! Sessions produce one synthetic sample per tick, the detector checks it
//! against static thresholds and a short trend look-ahead, and every alert
//! lands in an append-only log that doctor and patient views query.

pub mod detection;
pub mod emergency;
pub mod engine;
pub mod generator;
pub mod messages;
pub mod scenario;
pub mod sessions;
pub mod store;
pub mod types;

pub use engine::{MonitoringService, StartRequest};
pub use types::{
    AlertDigest, AlertFilter, MonitoringError, SessionStarted, SessionSummary, SeverityCounts,
    TickOutcome, VitalAverages,
};
