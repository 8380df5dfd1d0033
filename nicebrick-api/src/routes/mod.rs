//! REST API Routes Module
//!
//! Includes:
//! - Content and vote routes under /api
//! - Artifact (token metadata, image, hosted metadata) routes under /api
//! - Share card, info and session routes under /api
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for the mini-app frontend

pub mod artifact;
pub mod content;
pub mod health;
pub mod info;
pub mod metadata;
pub(crate) mod params;
pub mod session;
pub mod share;
pub mod vote;

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::extractors::{HEADER_DISPLAY_NAME, HEADER_FID, HEADER_PFP_URL, HEADER_USERNAME};
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub use artifact::create_router as artifact_router;
pub use content::create_router as content_router;
pub use health::create_router as health_router;
pub use info::create_router as info_router;
pub use metadata::create_router as metadata_router;
pub use session::create_router as session_router;
pub use share::create_router as share_router;
pub use vote::create_router as vote_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

#[cfg(feature = "openapi")]
fn with_openapi(router: Router<AppState>) -> Router<AppState> {
    router.route("/openapi.json", get(openapi_json))
}

#[cfg(not(feature = "openapi"))]
fn with_openapi(router: Router<AppState>) -> Router<AppState> {
    router
}

async fn not_found() -> ApiError {
    ApiError::not_found("No route matches this request")
}

// ============================================================================
// ROUTER
// ============================================================================

/// All application routes, mounted under `/api` by [`create_api_router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(content_router())
        .merge(vote_router())
        .merge(artifact_router())
        .merge(metadata_router())
        .merge(share_router())
        .merge(info_router())
        .merge(session_router())
}

/// Create the complete router.
///
/// - Application routes under /api/*
/// - Health checks at /health/*
/// - Metrics at /metrics (when enabled)
/// - OpenAPI spec at /openapi.json (with the `openapi` feature)
///
/// Unknown paths answer with a `NOT_FOUND` error body.
pub fn create_api_router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .nest("/api", api_routes())
        .nest("/health", health_router());

    if config.telemetry.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let mut router = with_openapi(router).fallback(not_found).with_state(state);

    if config.telemetry.metrics_enabled {
        router = router.layer(from_fn(observability_middleware));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config))
}

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// Otherwise only the configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::IF_NONE_MATCH,
            HeaderName::from_static(HEADER_FID),
            HeaderName::from_static(HEADER_USERNAME),
            HeaderName::from_static(HEADER_DISPLAY_NAME),
            HeaderName::from_static(HEADER_PFP_URL),
        ])
        .expose_headers([header::ETAG])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        return cors.allow_origin(Any);
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
    let exact: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter(|o| !o.starts_with("*."))
        .filter_map(|o| o.parse().ok())
        .collect();

    if config.cors_origins.iter().any(|o| o.starts_with("*.")) {
        // Wildcard subdomains need a predicate; exact entries match through it too.
        let config = config.clone();
        cors.allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &HeaderValue, _| {
                origin
                    .to_str()
                    .map(|o| config.is_origin_allowed(o))
                    .unwrap_or(false)
            },
        ))
    } else {
        cors.allow_origin(exact)
    }
}
