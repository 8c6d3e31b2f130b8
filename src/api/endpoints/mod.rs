//! API endpoint handlers.
//!
//! Handlers stay thin: validate input, call `MonitoringService`, map errors.

pub mod alerts;
pub mod health;
pub mod sessions;
