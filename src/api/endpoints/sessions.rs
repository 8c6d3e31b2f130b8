//! Monitoring session endpoints.
//!
//! - `POST /api/sessions`: start a session
//! - `GET /api/sessions/:id`: live session snapshot
//! - `POST /api/sessions/:id/tick`: advance one tick
//! - `DELETE /api/sessions/:id`: stop and summarize
//! - `GET /api/patients/:patient_id/summaries`: summaries of stopped sessions
//! - `GET /api/scenarios`: scenario catalog

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::models::{Scenario, SessionInfo};
use crate::monitoring::scenario::{self, ScenarioProfile};
use crate::monitoring::{SessionStarted, SessionSummary, StartRequest, TickOutcome};

/// `POST /api/sessions`
pub async fn start(
    State(ctx): State<ApiContext>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionStarted>), ApiError> {
    let Json(req) = payload?;
    if req.patient_id.trim().is_empty() {
        return Err(ApiError::BadRequest("patient_id is required".into()));
    }
    if req.latitude.is_some() != req.longitude.is_some() {
        return Err(ApiError::BadRequest(
            "latitude and longitude must be given together".into(),
        ));
    }

    let started = ctx.core.monitoring.start(req)?;
    Ok((StatusCode::CREATED, Json(started)))
}

/// `GET /api/sessions/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionInfo>, ApiError> {
    let id = parse_id(&session_id, "Session")?;
    Ok(Json(ctx.core.monitoring.get(&id)?))
}

/// `POST /api/sessions/:id/tick`
pub async fn tick(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<Json<TickOutcome>, ApiError> {
    let id = parse_id(&session_id, "Session")?;
    Ok(Json(ctx.core.monitoring.tick(&id)?))
}

/// `DELETE /api/sessions/:id`
pub async fn stop(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    let id = parse_id(&session_id, "Session")?;
    Ok(Json(ctx.core.monitoring.stop(&id)?))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SummariesResponse {
    pub summaries: Vec<SessionSummary>,
}

/// `GET /api/patients/:patient_id/summaries`: newest first, 20 unless `?limit=`.
pub async fn summaries_for_patient(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummariesResponse>, ApiError> {
    let summaries = ctx
        .core
        .monitoring
        .summaries_for_patient(&patient_id, query.limit)?;
    Ok(Json(SummariesResponse { summaries }))
}

#[derive(Serialize)]
pub struct ScenarioEntry {
    pub name: &'static str,
    pub ranges: &'static ScenarioProfile,
}

#[derive(Serialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<ScenarioEntry>,
}

/// `GET /api/scenarios`
pub async fn catalog() -> Json<ScenariosResponse> {
    let scenarios = scenario::catalog_names()
        .into_iter()
        .zip(Scenario::ALL.iter().copied())
        .map(|(name, s)| ScenarioEntry {
            name,
            ranges: scenario::profile(s),
        })
        .collect();

    Json(ScenariosResponse { scenarios })
}
