//! OpenAPI Specification for the NiceBrick API
//!
//! Built by utoipa from the route annotations and the request/response
//! types. Served at `/openapi.json` and printed by the `generate-openapi`
//! binary.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::metadata::{MetadataAttribute, TokenMetadata};
use crate::routes::artifact::{ArtifactRequest, ArtifactResponse};
use crate::routes::content::{ContentResponse, ContentStatusResponse};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::info::InfoResponse;
use crate::routes::share::{ShareImageRequest, ShareImageResponse};
use crate::routes::vote::{CastVoteRequest, CastVoteResponse, TallyResponse};

// Route modules for path references
use crate::routes::{artifact, content, health, info, metadata, session, share, vote};
use crate::telemetry::metrics;

use nicebrick_core::{
    DateKey, HexColor, Identity, IdentityMode, ResolvedIdentity, SubjectId, VoteKind, VoteTally,
};

/// OpenAPI document for the NiceBrick API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NiceBrick API",
        description = "Daily wish, community votes and personalized BearBrick artifacts for a Farcaster mini app",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "https://bearbrick.vercel.app", description = "Production"),
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Content", description = "Deterministic daily content per user"),
        (name = "Votes", description = "Idempotent like/dislike ledger"),
        (name = "Artifacts", description = "BearBrick token metadata and images"),
        (name = "Share", description = "Shareable wish card"),
        (name = "Meta", description = "Service description and caller identity"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        content::get_content,
        content::get_content_status,
        vote::cast_vote,
        vote::get_tally,
        artifact::create_artifact,
        artifact::get_artifact_image,
        metadata::get_metadata,
        share::create_share_image,
        session::get_session,
        info::get_info,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(
        schemas(
            // === Errors ===
            ApiError, ErrorCode,

            // === Domain ===
            SubjectId, DateKey, HexColor, VoteKind, VoteTally,
            Identity, IdentityMode, ResolvedIdentity,
            TokenMetadata, MetadataAttribute,

            // === Requests / Responses ===
            ContentResponse, ContentStatusResponse,
            CastVoteRequest, CastVoteResponse, TallyResponse,
            ArtifactRequest, ArtifactResponse,
            ShareImageRequest, ShareImageResponse,
            InfoResponse,
            HealthResponse, HealthStatus, HealthDetails, ComponentHealth
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() -> Result<(), String> {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "NiceBrick API");

        let tags = openapi
            .tags
            .as_ref()
            .ok_or_else(|| "OpenAPI tags missing".to_string())?;
        assert_eq!(tags.len(), 7);

        let components = openapi
            .components
            .as_ref()
            .ok_or_else(|| "OpenAPI components missing".to_string())?;
        assert!(components.schemas.contains_key("ApiError"));
        assert!(components.schemas.contains_key("CastVoteRequest"));
        Ok(())
    }

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        for path in [
            "/api/content",
            "/api/content-status",
            "/api/vote",
            "/api/artifact",
            "/api/artifact-image/{subject_id}",
            "/api/metadata/{subject_id}",
            "/api/share-image",
            "/api/session",
            "/api/info",
            "/health/ping",
            "/health/live",
            "/health/ready",
            "/metrics",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_json_serialization() -> Result<(), String> {
        let json = ApiDoc::to_json().map_err(|e| format!("Failed to serialize OpenAPI: {}", e))?;
        serde_json::from_str::<serde_json::Value>(&json)
            .map_err(|e| format!("Generated JSON invalid: {}", e))?;
        assert!(json.contains("NiceBrick API"));
        Ok(())
    }
}
