use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Alert, AlertSeverity, Scenario, VitalType, VitalsSample};

use super::emergency::EmergencyAction;

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub session_id: Uuid,
    pub scenario: Scenario,
}

/// Everything a single tick produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutcome {
    pub session_id: Uuid,
    pub tick_count: u64,
    pub sample: VitalsSample,
    pub alerts: Vec<Alert>,
    pub emergency_actions: Vec<EmergencyAction>,
}

/// Returned by `stop`. The session itself is gone afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub patient_id: String,
    pub scenario: Scenario,
    pub total_ticks: u64,
    pub total_alerts: usize,
    pub duration_secs: i64,
    pub ended_at: DateTime<Utc>,
    /// Means over every sample of the session. `None` if it never ticked.
    pub averages: Option<VitalAverages>,
    pub alerts_by_severity: SeverityCounts,
    /// Every alert the session raised, in emission order.
    pub alerts: Vec<AlertDigest>,
}

/// The part of an alert kept with a session summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDigest {
    pub severity: AlertSeverity,
    pub vital_type: VitalType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Alert> for AlertDigest {
    fn from(alert: &Alert) -> Self {
        Self {
            severity: alert.severity,
            vital_type: alert.vital_type,
            message: alert.message.clone(),
            timestamp: alert.timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalAverages {
    pub heart_rate: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub spo2: f64,
    pub temperature: f64,
    pub respiratory_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: AlertSeverity) {
        match severity {
            AlertSeverity::Medium => self.medium += 1,
            AlertSeverity::High => self.high += 1,
            AlertSeverity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.medium + self.high + self.critical
    }
}

// ---------------------------------------------------------------------------
// Running totals
// ---------------------------------------------------------------------------

/// Per-vital running sums, so averages cover samples already evicted
/// from the history window.
#[derive(Debug, Clone, Default)]
pub struct RunningTotals {
    sums: [f64; 6],
    count: u64,
}

impl RunningTotals {
    pub fn add(&mut self, sample: &VitalsSample) {
        for (slot, vital) in self.sums.iter_mut().zip(VitalType::ALL) {
            *slot += sample.get(vital);
        }
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn averages(&self) -> Option<VitalAverages> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = |i: usize| round1(self.sums[i] / n);
        Some(VitalAverages {
            heart_rate: mean(0),
            systolic: mean(1),
            diastolic: mean(2),
            spo2: mean(3),
            temperature: mean(4),
            respiratory_rate: mean(5),
        })
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Query filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// MonitoringError
// ---------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonitoringError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Alert not found: {0}")]
    AlertNotFound(Uuid),

    #[error("Internal lock failed")]
    LockFailed,
}
