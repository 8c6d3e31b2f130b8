//! Alert views.
//!
//! - `GET /api/doctors/:doctor_id/alerts`: alerts routed to a doctor
//! - `GET /api/patients/:patient_id/alerts`: alerts about a patient
//! - `PUT /api/alerts/:id/read`: acknowledge one alert

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::models::Alert;
use crate::monitoring::AlertFilter;

#[derive(Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
    pub unread_count: usize,
}

impl AlertsResponse {
    fn new(alerts: Vec<Alert>) -> Self {
        let unread_count = alerts.iter().filter(|a| !a.read).count();
        Self {
            alerts,
            unread_count,
        }
    }
}

/// `GET /api/doctors/:doctor_id/alerts`: newest first.
pub async fn for_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<String>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let alerts = ctx.core.monitoring.alerts_for_doctor(&doctor_id, &filter)?;
    Ok(Json(AlertsResponse::new(alerts)))
}

/// `GET /api/patients/:patient_id/alerts`: newest first.
pub async fn for_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<AlertsResponse>, ApiError> {
    let alerts = ctx.core.monitoring.alerts_for_patient(&patient_id, &filter)?;
    Ok(Json(AlertsResponse::new(alerts)))
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub message: &'static str,
    pub alert_id: Uuid,
}

/// `PUT /api/alerts/:id/read`: idempotent.
pub async fn mark_read(
    State(ctx): State<ApiContext>,
    Path(alert_id): Path<String>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let id = parse_id(&alert_id, "Alert")?;
    ctx.core.monitoring.mark_read(&id)?;

    Ok(Json(MarkReadResponse {
        message: "Marked as read",
        alert_id: id,
    }))
}
