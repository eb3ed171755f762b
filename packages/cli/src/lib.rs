// ABOUTME: Server assembly for the Toolkit agent service
// ABOUTME: Wires configuration, storage, and the API router into a running axum server

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError};
use toolkit_api::{create_router, DbState};

/// Build the application router with CORS and request tracing
pub fn build_app(state: DbState, config: &Config) -> anyhow::Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Open the database, apply migrations, and serve until Ctrl+C
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = toolkit_storage::connect(&config.storage_config())
        .await
        .context("Failed to open database")?;

    let state = DbState::new(pool)
        .with_metrics(config.metrics_enabled)
        .with_validator(config.validator());
    let app = build_app(state, &config)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply pending migrations and exit
pub async fn run_migrations(config: &Config) -> anyhow::Result<()> {
    let storage_config = config.storage_config();
    // Connecting runs the embedded migrator
    let pool = toolkit_storage::connect(&storage_config)
        .await
        .context("Failed to migrate database")?;
    pool.close().await;

    info!(
        "Database at {} is up to date",
        storage_config.path.display()
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
