//! HTTP server initialization and runtime setup.
//!
//! Connects the store, wires the services and runs the Axum server until
//! Ctrl-C.

use crate::config::Config;
use crate::infrastructure::persistence::PgStore;
use crate::routes::app_router;
use crate::state::AppState;
use crate::telemetry;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL store (connect, ping, migrate)
/// - Auth and link services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = Arc::new(
        PgStore::connect(
            &config.database.connection_settings(),
            telemetry::store_span(),
        )
        .await
        .context("Failed to initialize store")?,
    );

    let state = AppState::new(
        store.clone(),
        config.auth_config()?,
        config.base_url.clone(),
        telemetry::auth_span(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
