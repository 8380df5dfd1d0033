//! NiceBrick API - REST layer for the daily-wish and BearBrick mini apps
//!
//! Serves the deterministic daily content, the idempotent vote ledger and
//! the BearBrick artifact endpoints over Axum. Votes live in a pluggable
//! key-value store (in-memory or PostgreSQL); generated artifacts are kept
//! in a TTL cache keyed by a fingerprint of their inputs.

pub mod config;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod metadata;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ApiConfig, Environment, LogFormat, RendererKind, StoreBackend, TelemetryConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::CallerIdentity;
pub use metadata::{hosted_image_url, MetadataBuilder, TokenArtifact, TokenMetadata};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, ArtifactStore, SharedRenderer};
