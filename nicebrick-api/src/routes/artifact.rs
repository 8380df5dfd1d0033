//! BearBrick artifacts: cached token metadata and the live image endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use nicebrick_core::{user_label, Fingerprint, HexColor, RenderError, SubjectId};
use nicebrick_render::{placeholder_svg, svg_data_url, BearBrickOptions};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::metadata::{MetadataBuilder, TokenArtifact, TokenMetadata};
use crate::routes::params;
use crate::state::{AppState, ArtifactStore, SharedRenderer};
use crate::telemetry::metrics;

/// Images are pure functions of their URL.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

// ============================================================================
// TYPES
// ============================================================================

/// Body of `POST /api/artifact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    #[serde(alias = "fid")]
    pub subject_id: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    /// Six hex digits, `#` optional.
    pub primary_color: Option<String>,
    /// Six hex digits, `#` optional.
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResponse {
    pub metadata: TokenMetadata,
    pub token_uri: String,
    /// SHA-256 of the generator inputs.
    pub fingerprint: String,
    /// Served from the artifact cache.
    pub cached: bool,
}

/// Query of the image endpoint. `user` is accepted as an alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct ImageQuery {
    #[serde(alias = "user")]
    pub display_name: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /api/artifact - Generate (or reuse) token metadata for a BearBrick
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/artifact",
    tag = "Artifacts",
    request_body = ArtifactRequest,
    responses(
        (status = 200, description = "Token metadata and URI", body = ArtifactResponse),
        (status = 400, description = "Missing subject or malformed color", body = ApiError),
        (status = 500, description = "Renderer produced no output", body = ApiError),
        (status = 503, description = "No renderer configured", body = ApiError),
    ),
))]
pub async fn create_artifact(
    State(config): State<Arc<ApiConfig>>,
    State(artifacts): State<ArtifactStore>,
    State(renderer): State<SharedRenderer>,
    ApiJson(req): ApiJson<ArtifactRequest>,
) -> ApiResult<Json<ArtifactResponse>> {
    let subject_id = params::subject_from_u64(req.subject_id)?;
    let primary = HexColor::parse(
        "primaryColor",
        params::require("primaryColor", req.primary_color.as_deref())?,
    )?;
    let secondary = HexColor::parse(
        "secondaryColor",
        params::require("secondaryColor", req.secondary_color.as_deref())?,
    )?;
    let username = params::optional_text(req.username);
    let display_name = params::optional_text(req.display_name);

    let renderer = renderer.ok_or(RenderError::RendererUnavailable)?;

    let fingerprint = Fingerprint::bearbrick(
        subject_id,
        &primary,
        &secondary,
        username.as_deref(),
        display_name.as_deref(),
    );

    let generate = || -> ApiResult<Arc<TokenArtifact>> {
        let options = BearBrickOptions::new(subject_id)
            .with_colors(primary.clone(), secondary.clone())
            .with_username(username.clone())
            .with_display_name(display_name.clone());
        let svg = renderer.render_checked(&options)?;

        let label = user_label(subject_id, username.as_deref(), display_name.as_deref());
        let metadata = MetadataBuilder::new(subject_id, &label, &config.app_url)
            .image(svg_data_url(&svg))
            .colors(&primary, &secondary)
            .build();
        Ok(Arc::new(TokenArtifact::new(metadata)?))
    };
    let read = artifacts.get_or_generate(&fingerprint, config.artifact_cache_ttl, generate)?;

    let cached = read.was_cache_hit();
    if let Some(metrics) = metrics() {
        metrics.record_artifact_cache(cached);
    }
    tracing::debug!(
        subject_id = %subject_id,
        fingerprint = %fingerprint.digest(),
        cached,
        renderer = renderer.name(),
        "Artifact served"
    );

    let artifact = read.into_value();
    Ok(Json(ArtifactResponse {
        metadata: artifact.metadata.clone(),
        token_uri: artifact.token_uri.clone(),
        fingerprint: fingerprint.digest(),
        cached,
    }))
}

/// GET /api/artifact-image/{subject_id} - BearBrick SVG with the default palette
///
/// Rendered on every request; not backed by the artifact cache. Serves a
/// placeholder when no renderer is configured.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artifact-image/{subject_id}",
    tag = "Artifacts",
    params(
        ("subject_id" = u64, Path, description = "Farcaster id"),
        ImageQuery,
    ),
    responses(
        (status = 200, description = "SVG image", content_type = "image/svg+xml"),
        (status = 304, description = "Client copy is current"),
        (status = 400, description = "Invalid subject id", body = ApiError),
        (status = 500, description = "Renderer failed", body = ApiError),
    ),
))]
pub async fn get_artifact_image(
    State(renderer): State<SharedRenderer>,
    ApiPath(raw_subject): ApiPath<String>,
    ApiQuery(query): ApiQuery<ImageQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let subject_id: SubjectId = raw_subject.parse()?;
    // `FID n` is the hosted metadata's own default label, not a name.
    let display_name =
        params::optional_text(query.display_name).filter(|name| !name.starts_with("FID "));

    let fingerprint = Fingerprint::builder("artifact-image")
        .part(&subject_id.to_string())
        .optional(display_name.as_deref())
        .part(renderer.as_ref().map(|r| r.name()).unwrap_or("placeholder"))
        .build();
    let etag = format!("\"{}\"", &fingerprint.digest()[..32]);

    if if_none_match(&headers, &etag) {
        return Ok(image_response(StatusCode::NOT_MODIFIED, &etag, String::new()));
    }

    let svg = match renderer {
        Some(renderer) => {
            let options = BearBrickOptions::new(subject_id).with_display_name(display_name);
            renderer.render_checked(&options)?
        }
        None => {
            tracing::debug!(subject_id = %subject_id, "No renderer configured, serving placeholder");
            placeholder_svg(subject_id)
        }
    };

    Ok(image_response(StatusCode::OK, &etag, svg))
}

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|candidate| {
            let candidate = candidate.trim();
            candidate == etag || candidate == "*"
        }))
        .unwrap_or(false)
}

fn image_response(status: StatusCode, etag: &str, body: String) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(SVG_CONTENT_TYPE));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_CACHE_CONTROL));
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, value);
    }
    response
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/artifact", post(create_artifact))
        .route("/artifact-image/:subject_id", get(get_artifact_image))
}
