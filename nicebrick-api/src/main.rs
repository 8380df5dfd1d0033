//! NiceBrick API Server Entry Point
//!
//! Loads configuration from the environment, connects the vote store and
//! starts the Axum HTTP server.

use nicebrick_api::telemetry::init_tracing;
use nicebrick_api::{create_api_router, ApiConfig, ApiError, ApiResult, AppState};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let config = ApiConfig::from_env()?;
    init_tracing(&config.telemetry)?;
    config.validate()?;

    let addr = config.bind_addr;
    tracing::info!(
        environment = ?config.environment,
        store = ?config.store.backend,
        renderer = ?config.renderer,
        "Configuration loaded"
    );

    let state = AppState::from_config(config).await?;
    tracing::info!(
        wishes = state.catalog.len(),
        store = state.ledger.backend_name(),
        "Application state ready"
    );

    let app = create_api_router(state);

    tracing::info!(%addr, "Starting NiceBrick API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
