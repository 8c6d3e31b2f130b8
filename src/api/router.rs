//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Cache-Control: no-store → 3. Audit logger

use std::sync::Arc;

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the monitoring API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/scenarios", get(endpoints::sessions::catalog))
        .route("/sessions", post(endpoints::sessions::start))
        .route(
            "/sessions/:id",
            get(endpoints::sessions::detail).delete(endpoints::sessions::stop),
        )
        .route("/sessions/:id/tick", post(endpoints::sessions::tick))
        .route(
            "/doctors/:doctor_id/alerts",
            get(endpoints::alerts::for_doctor),
        )
        .route(
            "/patients/:patient_id/alerts",
            get(endpoints::alerts::for_patient),
        )
        .route(
            "/patients/:patient_id/summaries",
            get(endpoints::sessions::summaries_for_patient),
        )
        .route("/alerts/:id/read", put(endpoints::alerts::mark_read))
        .with_state(ctx)
        // Innermost first, outermost last
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", routes)
}
