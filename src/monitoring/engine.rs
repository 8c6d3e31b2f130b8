use std::str::FromStr;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::SUMMARY_LIST_LIMIT;
use crate::models::{Alert, AlertSeverity, GeoLocation, Scenario, SessionInfo};

use super::emergency::EmergencyProtocol;
use super::sessions::{NewSession, SessionStore};
use super::store::{AlertStore, SummaryStore};
use super::types::{AlertFilter, MonitoringError, SessionStarted, SessionSummary, TickOutcome};

/// Input to `start`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    /// Missing deserializes as empty so transports can reject it uniformly.
    #[serde(default)]
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub doctor_id: Option<String>,
    /// Catalog key. Absent or unknown picks a random scenario.
    pub scenario: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Orchestrates sessions, generation, detection and the alert log.
pub struct MonitoringService {
    pub(crate) sessions: SessionStore,
    pub(crate) alerts: AlertStore,
    pub(crate) summaries: SummaryStore,
    /// Master RNG: scenario choice and per-session seeds. Never held during a tick.
    rng: Mutex<StdRng>,
}

impl MonitoringService {
    /// Service seeded from entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Service with a fixed master seed. Same seed, same sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            sessions: SessionStore::new(),
            alerts: AlertStore::new(),
            summaries: SummaryStore::new(),
            rng: Mutex::new(rng),
        }
    }

    pub fn start(&self, req: StartRequest) -> Result<SessionStarted, MonitoringError> {
        let (scenario, seed) = {
            let mut rng = self.rng.lock().map_err(|_| MonitoringError::LockFailed)?;
            let scenario = resolve_scenario(req.scenario.as_deref(), &mut *rng);
            (scenario, rng.gen::<u64>())
        };

        let patient_name = req
            .patient_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| req.patient_id.clone());

        let session_id = self.sessions.start(NewSession {
            patient_id: req.patient_id.clone(),
            patient_name,
            doctor_id: req.doctor_id.clone(),
            scenario,
            location: GeoLocation::from_parts(req.latitude, req.longitude),
            seed,
        })?;

        tracing::info!(
            session_id = %session_id,
            patient_id = %req.patient_id,
            doctor_id = req.doctor_id.as_deref().unwrap_or("-"),
            scenario = scenario.as_str(),
            "Monitoring session started"
        );

        Ok(SessionStarted {
            session_id,
            scenario,
        })
    }

    pub fn get(&self, session_id: &Uuid) -> Result<SessionInfo, MonitoringError> {
        self.sessions.get(session_id)
    }

    pub fn tick(&self, session_id: &Uuid) -> Result<TickOutcome, MonitoringError> {
        let (tick_count, sample, alerts) = self.sessions.tick(session_id, &self.alerts)?;

        for alert in &alerts {
            if alert.severity == AlertSeverity::Critical {
                tracing::warn!(
                    session_id = %session_id,
                    alert_id = %alert.id,
                    vital_type = alert.vital_type.as_str(),
                    value = alert.current_value,
                    "Critical vitals alert"
                );
            } else {
                tracing::info!(
                    session_id = %session_id,
                    alert_id = %alert.id,
                    vital_type = alert.vital_type.as_str(),
                    severity = alert.severity.as_str(),
                    value = alert.current_value,
                    predicted = alert.predicted_value,
                    "Vitals alert"
                );
            }
        }

        let emergency_actions = EmergencyProtocol::process_critical_alerts(&alerts);

        Ok(TickOutcome {
            session_id: *session_id,
            tick_count,
            sample,
            alerts,
            emergency_actions,
        })
    }

    pub fn stop(&self, session_id: &Uuid) -> Result<SessionSummary, MonitoringError> {
        let summary = self.sessions.stop(session_id, &self.alerts)?;
        self.summaries.add(summary.clone())?;

        tracing::info!(
            session_id = %session_id,
            ticks = summary.total_ticks,
            alerts = summary.total_alerts,
            duration_secs = summary.duration_secs,
            "Monitoring session stopped"
        );

        Ok(summary)
    }

    pub fn alerts_for_doctor(
        &self,
        doctor_id: &str,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, MonitoringError> {
        self.alerts.list_by_doctor(doctor_id, filter)
    }

    pub fn alerts_for_patient(
        &self,
        patient_id: &str,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, MonitoringError> {
        self.alerts.list_by_patient(patient_id, filter)
    }

    /// Summaries of a patient's stopped sessions, newest first.
    /// `limit` defaults to `SUMMARY_LIST_LIMIT`.
    pub fn summaries_for_patient(
        &self,
        patient_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SessionSummary>, MonitoringError> {
        self.summaries
            .list_by_patient(patient_id, limit.unwrap_or(SUMMARY_LIST_LIMIT))
    }

    pub fn mark_read(&self, alert_id: &Uuid) -> Result<(), MonitoringError> {
        self.alerts.mark_read(alert_id)
    }

    pub fn active_sessions(&self) -> Result<usize, MonitoringError> {
        self.sessions.len()
    }
}

impl Default for MonitoringService {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit catalog key wins; absent or unknown draws uniformly from the catalog.
fn resolve_scenario<R: Rng + ?Sized>(requested: Option<&str>, rng: &mut R) -> Scenario {
    if let Some(name) = requested {
        if let Ok(scenario) = Scenario::from_str(name) {
            return scenario;
        }
        tracing::warn!(requested = name, "Unknown scenario, choosing one at random");
    }
    Scenario::ALL
        .choose(rng)
        .copied()
        .unwrap_or(Scenario::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VitalType;

    fn request(patient: &str, scenario: Option<&str>) -> StartRequest {
        StartRequest {
            patient_id: patient.into(),
            patient_name: Some("Meera".into()),
            doctor_id: Some("d1".into()),
            scenario: scenario.map(Into::into),
            latitude: Some(28.6139),
            longitude: Some(77.2090),
        }
    }

    #[test]
    fn explicit_scenario_is_kept() {
        let service = MonitoringService::with_seed(1);
        let started = service.start(request("p1", Some("bradycardia"))).unwrap();
        assert_eq!(started.scenario, Scenario::Bradycardia);
    }

    #[test]
    fn unknown_scenario_never_fails() {
        let service = MonitoringService::with_seed(2);
        for _ in 0..20 {
            let started = service.start(request("p1", Some("alien_flu"))).unwrap();
            assert!(Scenario::ALL.contains(&started.scenario));
        }
    }

    #[test]
    fn missing_scenario_draws_from_catalog() {
        let service = MonitoringService::with_seed(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(service.start(request("p1", None)).unwrap().scenario);
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn patient_name_defaults_to_id() {
        let service = MonitoringService::with_seed(4);
        let mut req = request("patient-42", Some("normal"));
        req.patient_name = None;
        let started = service.start(req).unwrap();
        let info = service.get(&started.session_id).unwrap();
        assert_eq!(info.patient_name, "patient-42");
        assert!(info.location.is_some());
    }

    #[test]
    fn same_seed_reproduces_ticks() {
        let a = MonitoringService::with_seed(77);
        let b = MonitoringService::with_seed(77);
        let sa = a.start(request("p1", None)).unwrap();
        let sb = b.start(request("p1", None)).unwrap();
        assert_eq!(sa.scenario, sb.scenario);

        let ta = a.tick(&sa.session_id).unwrap();
        let tb = b.tick(&sb.session_id).unwrap();
        assert_eq!(ta.sample.heart_rate, tb.sample.heart_rate);
        assert_eq!(ta.sample.spo2, tb.sample.spo2);
        assert_eq!(ta.alerts.len(), tb.alerts.len());
    }

    #[test]
    fn hypertensive_crisis_raises_systolic_alert_within_five_ticks() {
        let service = MonitoringService::with_seed(2025);
        let started = service
            .start(request("p1", Some("hypertensive_crisis")))
            .unwrap();

        let mut systolic_over_150 = 0;
        let mut found = false;
        for _ in 0..5 {
            let outcome = service.tick(&started.session_id).unwrap();
            if outcome.sample.systolic > 150.0 {
                systolic_over_150 += 1;
            }
            found |= outcome.alerts.iter().any(|a| {
                a.vital_type == VitalType::Systolic
                    && matches!(a.severity, AlertSeverity::High | AlertSeverity::Critical)
            });
        }
        assert!(found);
        assert!(systolic_over_150 >= 4);
    }

    #[test]
    fn critical_alerts_carry_emergency_actions() {
        let service = MonitoringService::with_seed(9);
        let started = service
            .start(request("p1", Some("cardiac_arrest_warning")))
            .unwrap();

        let outcome = service.tick(&started.session_id).unwrap();
        let critical = outcome
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count();
        assert_eq!(outcome.emergency_actions.len(), critical);
        assert!(outcome
            .alerts
            .iter()
            .all(|a| a.emergency_dispatched == (a.severity == AlertSeverity::Critical)));
    }

    #[test]
    fn alerts_survive_stop() {
        let service = MonitoringService::with_seed(10);
        let started = service
            .start(request("p7", Some("respiratory_distress")))
            .unwrap();
        let mut emitted = 0;
        for _ in 0..4 {
            emitted += service.tick(&started.session_id).unwrap().alerts.len();
        }

        let summary = service.stop(&started.session_id).unwrap();
        assert_eq!(summary.total_alerts, emitted);
        assert_eq!(summary.total_ticks, 4);

        let after = service
            .alerts_for_patient("p7", &AlertFilter::default())
            .unwrap();
        assert_eq!(after.len(), emitted);
        assert!(matches!(
            service.tick(&started.session_id),
            Err(MonitoringError::SessionNotFound(_))
        ));
    }

    #[test]
    fn stopped_sessions_are_kept_as_summaries() {
        let service = MonitoringService::with_seed(14);
        let mut stopped = Vec::new();
        for scenario in ["normal", "fever_sepsis", "bradycardia"] {
            let started = service.start(request("p9", Some(scenario))).unwrap();
            service.tick(&started.session_id).unwrap();
            stopped.push(service.stop(&started.session_id).unwrap().session_id);
        }
        let other = service.start(request("p10", Some("normal"))).unwrap();
        service.stop(&other.session_id).unwrap();

        let listed = service.summaries_for_patient("p9", None).unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0].ended_at >= w[1].ended_at));
        assert_eq!(listed[0].session_id, stopped[2]);
        // fever_sepsis always runs above the fever line
        let fever = listed.iter().find(|s| s.session_id == stopped[1]).unwrap();
        assert!(fever
            .alerts
            .iter()
            .any(|a| a.vital_type == VitalType::Temperature));

        assert_eq!(service.summaries_for_patient("p9", Some(1)).unwrap().len(), 1);
        assert!(service.summaries_for_patient("nobody", None).unwrap().is_empty());
    }

    #[test]
    fn summary_list_defaults_to_twenty() {
        let service = MonitoringService::with_seed(15);
        for _ in 0..(SUMMARY_LIST_LIMIT + 5) {
            let started = service.start(request("p1", Some("normal"))).unwrap();
            service.stop(&started.session_id).unwrap();
        }
        assert_eq!(
            service.summaries_for_patient("p1", None).unwrap().len(),
            SUMMARY_LIST_LIMIT
        );
    }

    #[test]
    fn mark_read_twice_is_fine() {
        let service = MonitoringService::with_seed(12);
        let started = service
            .start(request("p1", Some("cardiac_arrest_warning")))
            .unwrap();
        let outcome = service.tick(&started.session_id).unwrap();
        let alert_id = outcome.alerts[0].id;

        service.mark_read(&alert_id).unwrap();
        service.mark_read(&alert_id).unwrap();

        let listed = service
            .alerts_for_doctor("d1", &AlertFilter::default())
            .unwrap();
        assert!(listed.iter().find(|a| a.id == alert_id).unwrap().read);
        assert!(matches!(
            service.mark_read(&Uuid::new_v4()),
            Err(MonitoringError::AlertNotFound(_))
        ));
    }

    #[test]
    fn sessions_tick_in_parallel() {
        let service = std::sync::Arc::new(MonitoringService::with_seed(13));
        let ids: Vec<Uuid> = (0..4)
            .map(|i| {
                service
                    .start(request(&format!("p{i}"), Some("normal")))
                    .unwrap()
                    .session_id
            })
            .collect();

        let workers: Vec<_> = ids
            .iter()
            .map(|id| {
                let service = std::sync::Arc::clone(&service);
                let id = *id;
                std::thread::spawn(move || {
                    for _ in 0..30 {
                        service.tick(&id).unwrap();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        for id in ids {
            assert_eq!(service.get(&id).unwrap().tick_count, 30);
        }
        assert_eq!(service.active_sessions().unwrap(), 4);
    }
}
