//! API server lifecycle: starts and stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    pub started_at: DateTime<Utc>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait until the serve loop has exited.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` (port 0 picks an ephemeral port) and serve the API
/// in a background tokio task.
pub async fn start_api_server_on(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        started_at: Utc::now(),
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::monitoring::MonitoringService;

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    fn test_core() -> Arc<CoreState> {
        Arc::new(CoreState::with_service(MonitoringService::with_seed(7)))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_api_server_on(test_core(), loopback())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn full_session_over_http() {
        let mut server = start_api_server_on(test_core(), loopback())
            .await
            .expect("server should start");
        let base = format!("http://{}/api", server.addr);
        let client = reqwest::Client::new();

        let started: serde_json::Value = client
            .post(format!("{base}/sessions"))
            .json(&serde_json::json!({
                "patient_id": "p-http",
                "patient_name": "Asha",
                "doctor_id": "d-http",
                "scenario": "fever_sepsis",
                "latitude": 12.9716,
                "longitude": 77.5946,
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(started["scenario"], "fever_sepsis");
        let id = started["session_id"].as_str().unwrap().to_string();

        for expected in 1..=3u64 {
            let tick: serde_json::Value = client
                .post(format!("{base}/sessions/{id}/tick"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(tick["tick_count"], expected);
        }

        let resp = client
            .delete(format!("{base}/sessions/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let summary: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(summary["total_ticks"], 3);

        // Temperature alone keeps this scenario above the fever line
        let alerts: serde_json::Value = client
            .get(format!("{base}/patients/p-http/alerts"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(!alerts["alerts"].as_array().unwrap().is_empty());

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let mut server = start_api_server_on(test_core(), loopback())
            .await
            .expect("server should start");

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_api_server_on(test_core(), loopback())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown();
        server.wait().await;
    }
}
