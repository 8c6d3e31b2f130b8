use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Scenario;
use super::vital_sign::VitalsSample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// A location exists only when both coordinates are supplied.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Read-only view of a live monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: Option<String>,
    pub scenario: Scenario,
    pub location: Option<GeoLocation>,
    pub tick_count: u64,
    /// Retained window, oldest first.
    pub history: Vec<VitalsSample>,
    pub started_at: DateTime<Utc>,
}
