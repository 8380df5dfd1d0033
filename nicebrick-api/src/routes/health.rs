//! Health Check Endpoints
//!
//! Provides Kubernetes-compatible health check endpoints:
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check
//! - /health/ready - Vote store connectivity check
//!
//! No authentication required for health endpoints.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use nicebrick_storage::VoteLedger;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthDetails {
    pub store: ComponentHealth,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComponentHealth {
    pub status: HealthStatus,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
))]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
))]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check (vote store connectivity)
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Vote store unreachable", body = HealthResponse),
    ),
))]
pub async fn readiness(
    State(ledger): State<VoteLedger>,
    State(start_time): State<Instant>,
) -> impl IntoResponse {
    let store = check_store(&ledger).await;
    let ready = store.status == HealthStatus::Healthy;

    let response = HealthResponse {
        status: store.status,
        message: Some(
            if ready {
                "Service is ready"
            } else {
                "Vote store is unreachable"
            }
            .to_string(),
        ),
        details: Some(HealthDetails {
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: start_time.elapsed().as_secs(),
        }),
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response))
}

async fn check_store(ledger: &VoteLedger) -> ComponentHealth {
    let start = Instant::now();
    match ledger.store().ping().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            backend: ledger.backend_name().to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, backend = ledger.backend_name(), "Store health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                backend: ledger.backend_name().to_string(),
                latency_ms: None,
                error: Some("store ping failed".to_string()),
            }
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() -> Result<(), serde_json::Error> {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            message: Some("ok".to_string()),
            details: None,
        };
        let json = serde_json::to_string(&response)?;
        assert!(json.contains("\"healthy\""));
        assert!(!json.contains("details"));
        Ok(())
    }

    #[test]
    fn test_component_health_hides_missing_fields() -> Result<(), serde_json::Error> {
        let health = ComponentHealth {
            status: HealthStatus::Unhealthy,
            backend: "postgres".to_string(),
            latency_ms: None,
            error: Some("store ping failed".to_string()),
        };
        let json = serde_json::to_value(&health)?;
        assert_eq!(json["status"], "unhealthy");
        assert!(json.get("latency_ms").is_none());
        Ok(())
    }
}
