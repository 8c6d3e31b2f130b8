use uuid::Uuid;

use crate::models::Alert;

use super::types::{AlertDigest, AlertFilter, MonitoringError, SessionSummary};

/// Append-only alert log backed by RwLock.
/// Entries are never removed; `mark_read` is the only mutation.
pub struct AlertStore {
    pub(crate) log: std::sync::RwLock<Vec<Alert>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self {
            log: std::sync::RwLock::new(Vec::new()),
        }
    }

    pub fn add(&self, alert: Alert) -> Result<(), MonitoringError> {
        let mut log = self.log.write().map_err(|_| MonitoringError::LockFailed)?;
        log.push(alert);
        Ok(())
    }

    /// Append a tick's alerts under a single write lock.
    pub fn add_all(&self, alerts: &[Alert]) -> Result<(), MonitoringError> {
        if alerts.is_empty() {
            return Ok(());
        }
        let mut log = self.log.write().map_err(|_| MonitoringError::LockFailed)?;
        log.extend_from_slice(alerts);
        Ok(())
    }

    /// Alerts addressed to a doctor, newest first.
    pub fn list_by_doctor(
        &self,
        doctor_id: &str,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, MonitoringError> {
        self.query(|a| a.doctor_id.as_deref() == Some(doctor_id), filter)
    }

    /// Alerts about a patient, newest first.
    pub fn list_by_patient(
        &self,
        patient_id: &str,
        filter: &AlertFilter,
    ) -> Result<Vec<Alert>, MonitoringError> {
        self.query(|a| a.patient_id == patient_id, filter)
    }

    /// Flip `read` to true. Marking an already-read alert succeeds.
    pub fn mark_read(&self, alert_id: &Uuid) -> Result<(), MonitoringError> {
        let mut log = self.log.write().map_err(|_| MonitoringError::LockFailed)?;

        let alert = log
            .iter_mut()
            .find(|a| a.id == *alert_id)
            .ok_or(MonitoringError::AlertNotFound(*alert_id))?;

        alert.read = true;
        Ok(())
    }

    /// Digest of every alert attributed to a session, in emission order.
    pub fn digests_for_session(
        &self,
        session_id: &Uuid,
    ) -> Result<Vec<AlertDigest>, MonitoringError> {
        let log = self.log.read().map_err(|_| MonitoringError::LockFailed)?;
        Ok(log
            .iter()
            .filter(|a| a.session_id == *session_id)
            .map(AlertDigest::from)
            .collect())
    }

    pub fn len(&self) -> Result<usize, MonitoringError> {
        let log = self.log.read().map_err(|_| MonitoringError::LockFailed)?;
        Ok(log.len())
    }

    pub fn is_empty(&self) -> Result<bool, MonitoringError> {
        Ok(self.len()? == 0)
    }

    fn query<F>(&self, matches: F, filter: &AlertFilter) -> Result<Vec<Alert>, MonitoringError>
    where
        F: Fn(&Alert) -> bool,
    {
        let log = self.log.read().map_err(|_| MonitoringError::LockFailed)?;

        // Walk newest-appended first so equal timestamps keep reverse insertion order.
        let mut results: Vec<Alert> = log
            .iter()
            .rev()
            .filter(|a| matches(a) && (!filter.unread_only || !a.read))
            .cloned()
            .collect();
        // Stable sort: ties stay in the order collected above.
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }
        Ok(results)
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// SummaryStore
// ═══════════════════════════════════════════════════════════

/// Append-only log of summaries for stopped sessions.
pub struct SummaryStore {
    pub(crate) log: std::sync::RwLock<Vec<SessionSummary>>,
}

impl SummaryStore {
    pub fn new() -> Self {
        Self {
            log: std::sync::RwLock::new(Vec::new()),
        }
    }

    pub fn add(&self, summary: SessionSummary) -> Result<(), MonitoringError> {
        let mut log = self.log.write().map_err(|_| MonitoringError::LockFailed)?;
        log.push(summary);
        Ok(())
    }

    /// A patient's summaries, newest first, at most `limit`.
    pub fn list_by_patient(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionSummary>, MonitoringError> {
        let log = self.log.read().map_err(|_| MonitoringError::LockFailed)?;

        let mut results: Vec<SessionSummary> = log
            .iter()
            .rev()
            .filter(|s| s.patient_id == patient_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));
        results.truncate(limit);
        Ok(results)
    }

    pub fn len(&self) -> Result<usize, MonitoringError> {
        let log = self.log.read().map_err(|_| MonitoringError::LockFailed)?;
        Ok(log.len())
    }
}

impl Default for SummaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::alert::AlertSource;
    use crate::models::{AlertSeverity, VitalType};

    fn make_alert(patient: &str, doctor: Option<&str>, severity: AlertSeverity) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            session_id: Uuid::nil(),
            patient_id: patient.into(),
            patient_name: "Test Patient".into(),
            doctor_id: doctor.map(Into::into),
            vital_type: VitalType::HeartRate,
            current_value: 155.0,
            predicted_value: 155.0,
            severity,
            source: AlertSource::Threshold,
            message: "Heart rate is dangerously high at 155.0 bpm.".into(),
            location: None,
            timestamp: Utc::now(),
            read: false,
            doctor_notified: doctor.is_some(),
            emergency_dispatched: severity == AlertSeverity::Critical,
        }
    }

    #[test]
    fn list_by_doctor_newest_first() {
        let store = AlertStore::new();
        let base = Utc::now();
        for offset in [5, 1, 3] {
            let mut alert = make_alert("p1", Some("d1"), AlertSeverity::High);
            alert.timestamp = base + Duration::seconds(offset);
            store.add(alert).unwrap();
        }
        store
            .add(make_alert("p2", Some("d2"), AlertSeverity::High))
            .unwrap();

        let alerts = store.list_by_doctor("d1", &AlertFilter::default()).unwrap();
        assert_eq!(alerts.len(), 3);
        assert!(alerts
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(alerts[0].timestamp, base + Duration::seconds(5));
    }

    #[test]
    fn list_by_patient_ignores_doctor() {
        let store = AlertStore::new();
        store.add(make_alert("p1", None, AlertSeverity::Medium)).unwrap();
        store
            .add(make_alert("p1", Some("d9"), AlertSeverity::Medium))
            .unwrap();
        store.add(make_alert("p2", None, AlertSeverity::Medium)).unwrap();

        let alerts = store.list_by_patient("p1", &AlertFilter::default()).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(store
            .list_by_doctor("d1", &AlertFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn equal_timestamps_list_newest_appended_first() {
        let store = AlertStore::new();
        let ts = Utc::now();
        let mut first = make_alert("p1", None, AlertSeverity::Medium);
        let mut second = make_alert("p1", None, AlertSeverity::High);
        first.timestamp = ts;
        second.timestamp = ts;
        let second_id = second.id;
        store.add_all(&[first, second]).unwrap();

        let alerts = store.list_by_patient("p1", &AlertFilter::default()).unwrap();
        assert_eq!(alerts[0].id, second_id);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let store = AlertStore::new();
        let alert = make_alert("p1", Some("d1"), AlertSeverity::Critical);
        let id = alert.id;
        store.add(alert).unwrap();

        store.mark_read(&id).unwrap();
        store.mark_read(&id).unwrap();

        let alerts = store.list_by_doctor("d1", &AlertFilter::default()).unwrap();
        assert!(alerts[0].read);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn mark_read_unknown_fails() {
        let store = AlertStore::new();
        let id = Uuid::new_v4();
        match store.mark_read(&id).unwrap_err() {
            MonitoringError::AlertNotFound(missing) => assert_eq!(missing, id),
            other => panic!("Expected AlertNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn unread_filter_and_limit() {
        let store = AlertStore::new();
        let read = make_alert("p1", None, AlertSeverity::Medium);
        let read_id = read.id;
        store.add(read).unwrap();
        for _ in 0..4 {
            store.add(make_alert("p1", None, AlertSeverity::High)).unwrap();
        }
        store.mark_read(&read_id).unwrap();

        let filter = AlertFilter {
            unread_only: true,
            limit: None,
        };
        let unread = store.list_by_patient("p1", &filter).unwrap();
        assert_eq!(unread.len(), 4);
        assert!(unread.iter().all(|a| !a.read));

        let filter = AlertFilter {
            unread_only: false,
            limit: Some(2),
        };
        assert_eq!(store.list_by_patient("p1", &filter).unwrap().len(), 2);
    }

    #[test]
    fn digests_scoped_to_session_in_emission_order() {
        let store = AlertStore::new();
        let session = Uuid::new_v4();
        for severity in [
            AlertSeverity::Critical,
            AlertSeverity::High,
            AlertSeverity::Critical,
        ] {
            let mut alert = make_alert("p1", None, severity);
            alert.session_id = session;
            store.add(alert).unwrap();
        }
        store.add(make_alert("p1", None, AlertSeverity::Medium)).unwrap();

        let digests = store.digests_for_session(&session).unwrap();
        let severities: Vec<_> = digests.iter().map(|d| d.severity).collect();
        assert_eq!(
            severities,
            [
                AlertSeverity::Critical,
                AlertSeverity::High,
                AlertSeverity::Critical
            ]
        );
        assert_eq!(digests[0].vital_type, VitalType::HeartRate);
        assert!(digests[0].message.contains("155.0"));
    }

    fn make_summary(patient: &str, ended_at: chrono::DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            session_id: Uuid::new_v4(),
            patient_id: patient.into(),
            scenario: crate::models::Scenario::Normal,
            total_ticks: 1,
            total_alerts: 0,
            duration_secs: 0,
            ended_at,
            averages: None,
            alerts_by_severity: Default::default(),
            alerts: Vec::new(),
        }
    }

    #[test]
    fn summaries_listed_newest_first_and_limited() {
        let store = SummaryStore::new();
        let base = Utc::now();
        for offset in [2, 9, 4] {
            store
                .add(make_summary("p1", base + Duration::seconds(offset)))
                .unwrap();
        }
        store.add(make_summary("p2", base)).unwrap();

        let listed = store.list_by_patient("p1", 20).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].ended_at, base + Duration::seconds(9));
        assert_eq!(listed[2].ended_at, base + Duration::seconds(2));

        assert_eq!(store.list_by_patient("p1", 2).unwrap().len(), 2);
        assert!(store.list_by_patient("nobody", 20).unwrap().is_empty());
        assert_eq!(store.len().unwrap(), 4);
    }
}
