//! Clinical scenario catalog.
//!
//! Each scenario pins a baseline `(low, high)` range for all six vitals.
//! The table is static; nothing mutates it after startup.

use std::str::FromStr;

use serde::Serialize;

use crate::models::{Scenario, VitalType};

/// Baseline range for one vital under one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalRange {
    pub low: f64,
    pub high: f64,
}

impl VitalRange {
    const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.high - self.low) / 2.0
    }
}

/// Range table for a scenario. One field per vital, so a missing vital
/// cannot compile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioProfile {
    pub heart_rate: VitalRange,
    pub systolic: VitalRange,
    pub diastolic: VitalRange,
    pub spo2: VitalRange,
    pub temperature: VitalRange,
    pub respiratory_rate: VitalRange,
}

impl ScenarioProfile {
    pub fn range(&self, vital: VitalType) -> VitalRange {
        match vital {
            VitalType::HeartRate => self.heart_rate,
            VitalType::Systolic => self.systolic,
            VitalType::Diastolic => self.diastolic,
            VitalType::Spo2 => self.spo2,
            VitalType::Temperature => self.temperature,
            VitalType::RespiratoryRate => self.respiratory_rate,
        }
    }
}

const NORMAL: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(65.0, 90.0),
    systolic: VitalRange::new(110.0, 130.0),
    diastolic: VitalRange::new(70.0, 85.0),
    spo2: VitalRange::new(96.0, 100.0),
    temperature: VitalRange::new(36.5, 37.3),
    respiratory_rate: VitalRange::new(12.0, 18.0),
};

const TACHYCARDIA: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(110.0, 150.0),
    systolic: VitalRange::new(110.0, 140.0),
    diastolic: VitalRange::new(70.0, 90.0),
    spo2: VitalRange::new(94.0, 99.0),
    temperature: VitalRange::new(36.8, 37.8),
    respiratory_rate: VitalRange::new(18.0, 24.0),
};

const HYPOTENSION: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(95.0, 120.0),
    systolic: VitalRange::new(70.0, 90.0),
    diastolic: VitalRange::new(40.0, 60.0),
    spo2: VitalRange::new(92.0, 97.0),
    temperature: VitalRange::new(36.0, 37.0),
    respiratory_rate: VitalRange::new(18.0, 24.0),
};

const HYPERTENSIVE_CRISIS: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(85.0, 110.0),
    systolic: VitalRange::new(170.0, 210.0),
    diastolic: VitalRange::new(110.0, 130.0),
    spo2: VitalRange::new(94.0, 98.0),
    temperature: VitalRange::new(36.5, 37.5),
    respiratory_rate: VitalRange::new(16.0, 22.0),
};

const RESPIRATORY_DISTRESS: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(100.0, 125.0),
    systolic: VitalRange::new(120.0, 145.0),
    diastolic: VitalRange::new(75.0, 95.0),
    spo2: VitalRange::new(82.0, 90.0),
    temperature: VitalRange::new(37.0, 38.0),
    respiratory_rate: VitalRange::new(26.0, 36.0),
};

const FEVER_SEPSIS: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(105.0, 135.0),
    systolic: VitalRange::new(80.0, 100.0),
    diastolic: VitalRange::new(45.0, 65.0),
    spo2: VitalRange::new(90.0, 95.0),
    temperature: VitalRange::new(38.5, 40.5),
    respiratory_rate: VitalRange::new(22.0, 30.0),
};

const BRADYCARDIA: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(35.0, 50.0),
    systolic: VitalRange::new(90.0, 110.0),
    diastolic: VitalRange::new(55.0, 70.0),
    spo2: VitalRange::new(94.0, 98.0),
    temperature: VitalRange::new(36.2, 37.0),
    respiratory_rate: VitalRange::new(12.0, 16.0),
};

const CARDIAC_ARREST_WARNING: ScenarioProfile = ScenarioProfile {
    heart_rate: VitalRange::new(140.0, 200.0),
    systolic: VitalRange::new(70.0, 95.0),
    diastolic: VitalRange::new(40.0, 60.0),
    spo2: VitalRange::new(75.0, 88.0),
    temperature: VitalRange::new(35.5, 36.5),
    respiratory_rate: VitalRange::new(28.0, 40.0),
};

/// Range table for a scenario.
pub fn profile(scenario: Scenario) -> &'static ScenarioProfile {
    match scenario {
        Scenario::Normal => &NORMAL,
        Scenario::Tachycardia => &TACHYCARDIA,
        Scenario::Hypotension => &HYPOTENSION,
        Scenario::HypertensiveCrisis => &HYPERTENSIVE_CRISIS,
        Scenario::RespiratoryDistress => &RESPIRATORY_DISTRESS,
        Scenario::FeverSepsis => &FEVER_SEPSIS,
        Scenario::Bradycardia => &BRADYCARDIA,
        Scenario::CardiacArrestWarning => &CARDIAC_ARREST_WARNING,
    }
}

/// Resolve a scenario by name. Unknown names mean `normal`, never an error.
pub fn resolve_or_normal(name: &str) -> Scenario {
    Scenario::from_str(name).unwrap_or(Scenario::Normal)
}

/// Catalog keys in declaration order.
pub fn catalog_names() -> Vec<&'static str> {
    Scenario::ALL.iter().map(|s| s.as_str()).collect()
}
