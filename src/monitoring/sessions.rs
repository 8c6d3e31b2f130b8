//! Session store.
//!
//! The map lock is held only long enough to clone a session handle; each
//! session then serializes its own ticks behind its own `Mutex`, so ticks
//! on different sessions never wait on each other.
//!
//! Lock order is always session → alert log.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::config::HISTORY_WINDOW;
use crate::models::{Alert, GeoLocation, Scenario, SessionInfo, VitalsSample};

use super::detection;
use super::generator;
use super::store::AlertStore;
use super::types::{MonitoringError, RunningTotals, SessionSummary, SeverityCounts};

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

/// Parameters fixed at session start.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: Option<String>,
    pub scenario: Scenario,
    pub location: Option<GeoLocation>,
    /// Seed for the session's own sample jitter.
    pub seed: u64,
}

/// One live monitoring session.
pub struct Session {
    pub id: Uuid,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: Option<String>,
    pub scenario: Scenario,
    pub location: Option<GeoLocation>,
    pub tick_count: u64,
    /// Most recent samples, oldest first. Never longer than `HISTORY_WINDOW`.
    pub history: VecDeque<VitalsSample>,
    pub started_at: DateTime<Utc>,
    totals: RunningTotals,
    rng: StdRng,
    /// Set by `stop` so a tick that raced past the map lookup still fails.
    closed: bool,
}

impl Session {
    pub fn new(id: Uuid, params: NewSession) -> Self {
        Self {
            id,
            patient_id: params.patient_id,
            patient_name: params.patient_name,
            doctor_id: params.doctor_id,
            scenario: params.scenario,
            location: params.location,
            tick_count: 0,
            history: VecDeque::with_capacity(HISTORY_WINDOW + 1),
            started_at: Utc::now(),
            totals: RunningTotals::default(),
            rng: StdRng::seed_from_u64(params.seed),
            closed: false,
        }
    }

    /// Advance one tick: generate, detect against prior history, then record.
    pub fn advance(&mut self) -> (VitalsSample, Vec<Alert>) {
        self.tick_count += 1;
        let sample = generator::generate(self.scenario, self.tick_count, &mut self.rng);
        let alerts = detection::detect(self, &sample);
        self.record(sample.clone());
        (sample, alerts)
    }

    /// Append to history, evicting the oldest entry past the window.
    pub fn record(&mut self, sample: VitalsSample) {
        self.totals.add(&sample);
        self.history.push_back(sample);
        while self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            patient_id: self.patient_id.clone(),
            patient_name: self.patient_name.clone(),
            doctor_id: self.doctor_id.clone(),
            scenario: self.scenario,
            location: self.location,
            tick_count: self.tick_count,
            history: self.history.iter().cloned().collect(),
            started_at: self.started_at,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

type SessionHandle = Arc<Mutex<Session>>;

/// Keyed store of live sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session with a fresh id.
    pub fn start(&self, params: NewSession) -> Result<Uuid, MonitoringError> {
        let id = Uuid::new_v4();
        let session = Session::new(id, params);
        let mut map = self
            .sessions
            .write()
            .map_err(|_| MonitoringError::LockFailed)?;
        map.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Snapshot of a live session.
    pub fn get(&self, id: &Uuid) -> Result<SessionInfo, MonitoringError> {
        let handle = self.handle(id)?;
        Self::snapshot(id, &handle)
    }

    /// Run one tick and append its alerts to `alert_log`.
    ///
    /// The session lock covers the whole tick, so `tick_count` and `history`
    /// always move together.
    pub fn tick(
        &self,
        id: &Uuid,
        alert_log: &AlertStore,
    ) -> Result<(u64, VitalsSample, Vec<Alert>), MonitoringError> {
        let handle = self.handle(id)?;
        Self::tick_handle(id, &handle, alert_log)
    }

    fn snapshot(id: &Uuid, handle: &SessionHandle) -> Result<SessionInfo, MonitoringError> {
        let session = handle.lock().map_err(|_| MonitoringError::LockFailed)?;
        if session.closed {
            return Err(MonitoringError::SessionNotFound(*id));
        }
        Ok(session.info())
    }

    // A handle cloned before `stop` removed it still reaches here, hence `closed`.
    fn tick_handle(
        id: &Uuid,
        handle: &SessionHandle,
        alert_log: &AlertStore,
    ) -> Result<(u64, VitalsSample, Vec<Alert>), MonitoringError> {
        let mut session = handle.lock().map_err(|_| MonitoringError::LockFailed)?;
        if session.closed {
            return Err(MonitoringError::SessionNotFound(*id));
        }

        let (sample, alerts) = session.advance();
        alert_log.add_all(&alerts)?;

        tracing::debug!(
            session_id = %id,
            tick = session.tick_count,
            alerts = alerts.len(),
            "Tick complete"
        );

        Ok((session.tick_count, sample, alerts))
    }

    /// Remove a session and summarise it. The id is dead afterwards.
    pub fn stop(
        &self,
        id: &Uuid,
        alert_log: &AlertStore,
    ) -> Result<SessionSummary, MonitoringError> {
        let handle = {
            let mut map = self
                .sessions
                .write()
                .map_err(|_| MonitoringError::LockFailed)?;
            map.remove(id).ok_or(MonitoringError::SessionNotFound(*id))?
        };

        let mut session = handle.lock().map_err(|_| MonitoringError::LockFailed)?;
        session.closed = true;

        let alerts = alert_log.digests_for_session(id)?;
        let mut alerts_by_severity = SeverityCounts::default();
        for digest in &alerts {
            alerts_by_severity.record(digest.severity);
        }
        let ended_at = Utc::now();
        let duration_secs = (ended_at - session.started_at).num_seconds().max(0);

        Ok(SessionSummary {
            session_id: *id,
            patient_id: session.patient_id.clone(),
            scenario: session.scenario,
            total_ticks: session.tick_count,
            total_alerts: alerts.len(),
            duration_secs,
            ended_at,
            averages: session.totals.averages(),
            alerts_by_severity,
            alerts,
        })
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize, MonitoringError> {
        let map = self
            .sessions
            .read()
            .map_err(|_| MonitoringError::LockFailed)?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, MonitoringError> {
        Ok(self.len()? == 0)
    }

    fn handle(&self, id: &Uuid) -> Result<SessionHandle, MonitoringError> {
        let map = self
            .sessions
            .read()
            .map_err(|_| MonitoringError::LockFailed)?;
        map.get(id)
            .cloned()
            .ok_or(MonitoringError::SessionNotFound(*id))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
