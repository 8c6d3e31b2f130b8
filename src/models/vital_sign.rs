use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vital sign channels produced by the generator and inspected by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    HeartRate,
    Systolic,
    Diastolic,
    Spo2,
    Temperature,
    RespiratoryRate,
}

impl VitalType {
    pub const ALL: [VitalType; 6] = [
        VitalType::HeartRate,
        VitalType::Systolic,
        VitalType::Diastolic,
        VitalType::Spo2,
        VitalType::Temperature,
        VitalType::RespiratoryRate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VitalType::HeartRate => "heart_rate",
            VitalType::Systolic => "systolic",
            VitalType::Diastolic => "diastolic",
            VitalType::Spo2 => "spo2",
            VitalType::Temperature => "temperature",
            VitalType::RespiratoryRate => "respiratory_rate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "heart_rate" => Some(VitalType::HeartRate),
            "systolic" => Some(VitalType::Systolic),
            "diastolic" => Some(VitalType::Diastolic),
            "spo2" => Some(VitalType::Spo2),
            "temperature" => Some(VitalType::Temperature),
            "respiratory_rate" => Some(VitalType::RespiratoryRate),
            _ => None,
        }
    }

    /// Human-readable name used in alert messages.
    pub fn label(self) -> &'static str {
        match self {
            VitalType::HeartRate => "Heart rate",
            VitalType::Systolic => "Systolic blood pressure",
            VitalType::Diastolic => "Diastolic blood pressure",
            VitalType::Spo2 => "Oxygen saturation",
            VitalType::Temperature => "Body temperature",
            VitalType::RespiratoryRate => "Respiratory rate",
        }
    }

    /// Default unit for this vital type.
    pub fn unit(self) -> &'static str {
        match self {
            VitalType::HeartRate => "bpm",
            VitalType::Systolic | VitalType::Diastolic => "mmHg",
            VitalType::Spo2 => "%",
            VitalType::Temperature => "°C",
            VitalType::RespiratoryRate => "breaths/min",
        }
    }

    /// Hard physiological bound `(min, max)`. Generated values never leave it.
    pub fn hard_bounds(self) -> (f64, f64) {
        match self {
            VitalType::HeartRate => (30.0, 220.0),
            VitalType::Systolic => (60.0, 250.0),
            VitalType::Diastolic => (30.0, 150.0),
            VitalType::Spo2 => (60.0, 100.0),
            VitalType::Temperature => (33.0, 43.0),
            VitalType::RespiratoryRate => (4.0, 60.0),
        }
    }

    /// Clamp a value into this vital's hard bound.
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.hard_bounds();
        value.clamp(min, max)
    }
}

impl std::fmt::Display for VitalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated reading across all six channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSample {
    pub heart_rate: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub spo2: f64,
    pub temperature: f64,
    pub respiratory_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl VitalsSample {
    pub fn get(&self, vital: VitalType) -> f64 {
        match vital {
            VitalType::HeartRate => self.heart_rate,
            VitalType::Systolic => self.systolic,
            VitalType::Diastolic => self.diastolic,
            VitalType::Spo2 => self.spo2,
            VitalType::Temperature => self.temperature,
            VitalType::RespiratoryRate => self.respiratory_rate,
        }
    }

    pub fn set(&mut self, vital: VitalType, value: f64) {
        let slot = match vital {
            VitalType::HeartRate => &mut self.heart_rate,
            VitalType::Systolic => &mut self.systolic,
            VitalType::Diastolic => &mut self.diastolic,
            VitalType::Spo2 => &mut self.spo2,
            VitalType::Temperature => &mut self.temperature,
            VitalType::RespiratoryRate => &mut self.respiratory_rate,
        };
        *slot = value;
    }

    /// A sample with every channel at the same value. Handy as a builder seed.
    pub fn uniform(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            heart_rate: value,
            systolic: value,
            diastolic: value,
            spo2: value,
            temperature: value,
            respiratory_rate: value,
            timestamp,
        }
    }
}
