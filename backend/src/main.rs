//! Main entry point for the Pray Together backend.
//!
//! This file loads configuration, sets up logging and the database, builds
//! the Axum router and serves it until a shutdown signal arrives.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod member;
mod repositories;
mod state;
mod utils;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;

use anyhow::Context;
use config::Config;
use database::Database;
use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    utils::logging::init(&config);

    let db = Database::new(&config).await?;
    if config.auto_migrate {
        db.migrate().await?;
    }

    let state = AppState::new(config.clone(), db.clone())?;
    let app = api::router(state);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    info!(
        app = %config.app_name,
        env = %config.app_env,
        port = config.server_port,
        "Starting Pray Together server"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
