//! Anomaly detection over a single sample plus the session's prior history.
//!
//! Static rules are checked in a fixed order and the first match wins:
//! critical-high, critical-low, high, low. When none fires and at least
//! three prior samples exist, a two-step finite difference projects the
//! value one step ahead; crossing a critical boundary there raises a
//! medium trend alert. Each vital is evaluated independently.

use uuid::Uuid;

use crate::config::TREND_MIN_HISTORY;
use crate::models::alert::AlertSource;
use crate::models::{Alert, AlertSeverity, VitalType, VitalsSample};

use super::messages::MessageTemplates;
use super::sessions::Session;
use super::types::round1;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Threshold boundaries for one vital. Absent boundaries never fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub critical_high: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub critical_low: Option<f64>,
}

const HEART_RATE_RULE: ThresholdRule = ThresholdRule {
    critical_high: Some(150.0),
    high: Some(100.0),
    low: Some(60.0),
    critical_low: Some(40.0),
};

const SYSTOLIC_RULE: ThresholdRule = ThresholdRule {
    critical_high: Some(180.0),
    high: Some(140.0),
    low: Some(90.0),
    critical_low: Some(70.0),
};

const DIASTOLIC_RULE: ThresholdRule = ThresholdRule {
    critical_high: Some(120.0),
    high: Some(90.0),
    low: Some(60.0),
    critical_low: Some(40.0),
};

// Saturation only has a low side.
const SPO2_RULE: ThresholdRule = ThresholdRule {
    critical_high: None,
    high: None,
    low: Some(94.0),
    critical_low: Some(90.0),
};

const TEMPERATURE_RULE: ThresholdRule = ThresholdRule {
    critical_high: Some(40.0),
    high: Some(38.0),
    low: Some(36.0),
    critical_low: Some(35.0),
};

// No critical-low boundary for respiratory rate.
const RESPIRATORY_RATE_RULE: ThresholdRule = ThresholdRule {
    critical_high: Some(30.0),
    high: Some(24.0),
    low: Some(10.0),
    critical_low: None,
};

pub fn rule_for(vital: VitalType) -> &'static ThresholdRule {
    match vital {
        VitalType::HeartRate => &HEART_RATE_RULE,
        VitalType::Systolic => &SYSTOLIC_RULE,
        VitalType::Diastolic => &DIASTOLIC_RULE,
        VitalType::Spo2 => &SPO2_RULE,
        VitalType::Temperature => &TEMPERATURE_RULE,
        VitalType::RespiratoryRate => &RESPIRATORY_RATE_RULE,
    }
}

impl ThresholdRule {
    /// Static classification. First match wins.
    pub fn classify(&self, value: f64) -> Option<(AlertSeverity, StaticBreach)> {
        if self.critical_high.is_some_and(|t| value >= t) {
            Some((AlertSeverity::Critical, StaticBreach::CriticalHigh))
        } else if self.critical_low.is_some_and(|t| value <= t) {
            Some((AlertSeverity::Critical, StaticBreach::CriticalLow))
        } else if self.high.is_some_and(|t| value >= t) {
            Some((AlertSeverity::High, StaticBreach::High))
        } else if self.low.is_some_and(|t| value <= t) {
            Some((AlertSeverity::Medium, StaticBreach::Low))
        } else {
            None
        }
    }

    /// Whether `value` sits at or beyond either critical boundary.
    pub fn is_critical(&self, value: f64) -> bool {
        self.critical_high.is_some_and(|t| value >= t)
            || self.critical_low.is_some_and(|t| value <= t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticBreach {
    CriticalHigh,
    CriticalLow,
    High,
    Low,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Result of evaluating one vital on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub vital_type: VitalType,
    pub severity: AlertSeverity,
    pub source: AlertSource,
    pub current_value: f64,
    pub predicted_value: f64,
    pub message: String,
}

/// Delta from the oldest to the newest of the last three prior samples.
pub fn trend(vital: VitalType, prior: &[VitalsSample]) -> Option<f64> {
    if prior.len() < TREND_MIN_HISTORY {
        return None;
    }
    let newest = prior[prior.len() - 1].get(vital);
    let oldest = prior[prior.len() - TREND_MIN_HISTORY].get(vital);
    Some(newest - oldest)
}

/// Evaluate one vital. `prior` excludes the sample that produced `value`.
pub fn evaluate(vital: VitalType, value: f64, prior: &[VitalsSample]) -> Option<Finding> {
    let rule = rule_for(vital);
    let slope = trend(vital, prior);
    let predicted = round1(value + slope.unwrap_or(0.0));

    if let Some((severity, breach)) = rule.classify(value) {
        let message = match breach {
            StaticBreach::CriticalHigh => MessageTemplates::dangerously_high(vital, value),
            StaticBreach::CriticalLow => MessageTemplates::dangerously_low(vital, value),
            StaticBreach::High => MessageTemplates::above_normal(vital, value),
            StaticBreach::Low => MessageTemplates::below_normal(vital, value),
        };
        return Some(Finding {
            vital_type: vital,
            severity,
            source: AlertSource::Threshold,
            current_value: value,
            predicted_value: predicted,
            message,
        });
    }

    // Static rules are silent, so `value` itself is inside every critical boundary.
    if slope.is_some() && rule.is_critical(predicted) {
        return Some(Finding {
            vital_type: vital,
            severity: AlertSeverity::Medium,
            source: AlertSource::Trend,
            current_value: value,
            predicted_value: predicted,
            message: MessageTemplates::trending(vital, value, predicted),
        });
    }

    None
}

/// Evaluate every vital of `sample`.
pub fn evaluate_sample(sample: &VitalsSample, prior: &[VitalsSample]) -> Vec<Finding> {
    VitalType::ALL
        .into_iter()
        .filter_map(|vital| evaluate(vital, sample.get(vital), prior))
        .collect()
}

/// Build alerts for `sample` against `session`'s prior history.
pub fn detect(session: &Session, sample: &VitalsSample) -> Vec<Alert> {
    // The trend only reads the newest three entries.
    let skip = session.history.len().saturating_sub(TREND_MIN_HISTORY);
    let prior: Vec<VitalsSample> = session.history.iter().skip(skip).cloned().collect();

    evaluate_sample(sample, &prior)
        .into_iter()
        .map(|finding| Alert {
            id: Uuid::new_v4(),
            session_id: session.id,
            patient_id: session.patient_id.clone(),
            patient_name: session.patient_name.clone(),
            doctor_id: session.doctor_id.clone(),
            vital_type: finding.vital_type,
            current_value: finding.current_value,
            predicted_value: finding.predicted_value,
            severity: finding.severity,
            source: finding.source,
            message: finding.message,
            location: session.location,
            timestamp: sample.timestamp,
            read: false,
            doctor_notified: session.doctor_id.is_some(),
            emergency_dispatched: finding.severity == AlertSeverity::Critical,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
