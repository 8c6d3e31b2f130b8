use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AlertSeverity;
use super::session::GeoLocation;
use super::vital_sign::VitalType;

/// Whether the alert came from a static threshold or the trend look-ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    Threshold,
    Trend,
}

/// An alert raised during a tick. Only `read` ever changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub session_id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: Option<String>,
    pub vital_type: VitalType,
    pub current_value: f64,
    pub predicted_value: f64,
    pub severity: AlertSeverity,
    pub source: AlertSource,
    pub message: String,
    pub location: Option<GeoLocation>,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub doctor_notified: bool,
    pub emergency_dispatched: bool,
}
