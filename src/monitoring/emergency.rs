use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Alert, AlertSeverity, VitalType};

/// Emergency protocol handler for CRITICAL alerts.
pub struct EmergencyProtocol;

impl EmergencyProtocol {
    /// Turn the critical alerts of a tick into doctor/patient actions.
    pub fn process_critical_alerts(alerts: &[Alert]) -> Vec<EmergencyAction> {
        alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .map(|alert| {
                let location = alert
                    .location
                    .map(|l| format!(" Last known location: {:.5}, {:.5}.", l.latitude, l.longitude))
                    .unwrap_or_default();

                EmergencyAction {
                    alert_id: alert.id,
                    vital_type: alert.vital_type,
                    doctor_banner: format!(
                        "CRITICAL: {} ({}). {}{}",
                        alert.patient_name, alert.patient_id, alert.message, location,
                    ),
                    patient_banner: patient_banner(alert.vital_type),
                    notify_doctor: alert.doctor_notified,
                    dispatch_emergency: alert.emergency_dispatched,
                }
            })
            .collect()
    }
}

fn patient_banner(vital: VitalType) -> String {
    format!(
        "Your {} reading needs urgent attention. \
         Stay where you are; help has been alerted.",
        vital.label().to_lowercase(),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyAction {
    pub alert_id: Uuid,
    pub vital_type: VitalType,
    /// Clinical framing for the doctor view.
    pub doctor_banner: String,
    /// Plain-language framing for the patient view.
    pub patient_banner: String,
    pub notify_doctor: bool,
    pub dispatch_emergency: bool,
}
