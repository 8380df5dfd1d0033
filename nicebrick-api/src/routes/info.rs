//! App info.

use std::collections::BTreeMap;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Endpoint name to path.
    pub endpoints: BTreeMap<String, String>,
    pub features: Vec<String>,
}

impl InfoResponse {
    pub fn current() -> Self {
        let endpoints = [
            ("contentStatus", "/api/content-status"),
            ("content", "/api/content"),
            ("vote", "/api/vote"),
            ("artifact", "/api/artifact"),
            ("artifactImage", "/api/artifact-image/{subjectId}"),
            ("metadata", "/api/metadata/{subjectId}"),
            ("shareImage", "/api/share-image"),
            ("session", "/api/session"),
            ("info", "/api/info"),
            ("health", "/health/ready"),
            ("metrics", "/metrics"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        Self {
            name: "BearBrick".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Personalized BearBrick NFT preview for Farcaster users".to_string(),
            endpoints,
            features: vec![
                "Deterministic daily wish per Farcaster user".to_string(),
                "Idempotent like/dislike voting".to_string(),
                "BearBrick SVG rendering with cached token metadata".to_string(),
                "Disconnected mode with a fallback identity".to_string(),
            ],
        }
    }
}

/// GET /api/info - Name, version and endpoints
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/info",
    tag = "Meta",
    responses(
        (status = 200, description = "App info", body = InfoResponse),
    ),
))]
pub async fn get_info() -> Json<InfoResponse> {
    Json(InfoResponse::current())
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/info", get(get_info))
}
