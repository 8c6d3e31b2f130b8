pub mod api;
pub mod config;
pub mod core_state;
pub mod models;
pub mod monitoring;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Process entry point: logging, configuration, then serve until Ctrl-C.
pub async fn run() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let monitor_config = config::MonitorConfig::from_env();
    let core = Arc::new(core_state::CoreState::from_config(&monitor_config));

    let mut server = api::start_api_server_on(core, monitor_config.bind_addr).await?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }

    server.shutdown();
    server.wait().await;
    Ok(())
}
