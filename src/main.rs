mod api;
mod app_state;
mod core;
mod domain;
mod errors;
mod routes;

use anyhow::{Context, Result};
use tracing::info;

use crate::app_state::build_app_state;
use crate::core::config::app_config::AppConfig;
use crate::core::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(&config)?;

    let addr = config.server_addr.clone();
    let state = build_app_state(config)?;
    let app = routes::app_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🚀 GTM traffic datasource listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
