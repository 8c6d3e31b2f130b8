use crate::models::VitalType;

/// Message template builder for alert text.
/// Values are printed with one decimal and the vital's unit.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Value at or above the critical-high boundary.
    pub fn dangerously_high(vital: VitalType, value: f64) -> String {
        format!(
            "{} is dangerously high at {:.1} {}. Immediate attention required.",
            vital.label(),
            value,
            vital.unit(),
        )
    }

    /// Value at or below the critical-low boundary.
    pub fn dangerously_low(vital: VitalType, value: f64) -> String {
        format!(
            "{} is dangerously low at {:.1} {}. Immediate attention required.",
            vital.label(),
            value,
            vital.unit(),
        )
    }

    pub fn above_normal(vital: VitalType, value: f64) -> String {
        format!(
            "{} is above normal range at {:.1} {}.",
            vital.label(),
            value,
            vital.unit(),
        )
    }

    pub fn below_normal(vital: VitalType, value: f64) -> String {
        format!(
            "{} is below normal range at {:.1} {}.",
            vital.label(),
            value,
            vital.unit(),
        )
    }

    /// Trend look-ahead crossing a critical boundary.
    pub fn trending(vital: VitalType, current: f64, predicted: f64) -> String {
        let direction = if predicted >= current { "rising" } else { "falling" };
        format!(
            "{} is {} toward a critical level: currently {:.1} {}, predicted {:.1} {}.",
            vital.label(),
            direction,
            current,
            vital.unit(),
            predicted,
            vital.unit(),
        )
    }
}
