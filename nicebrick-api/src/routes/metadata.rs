//! Hosted token metadata.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use nicebrick_core::SubjectId;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::extractors::{ApiPath, ApiQuery};
use crate::metadata::{hosted_image_url, MetadataBuilder, TokenMetadata};
use crate::routes::params;
use crate::state::AppState;

/// Query of the metadata endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MetadataQuery {
    /// Label shown in the document; defaults to `FID n`.
    pub user: Option<String>,
}

/// GET /api/metadata/{subject_id} - Metadata document pointing at the hosted image
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/metadata/{subject_id}",
    tag = "Artifacts",
    params(
        ("subject_id" = u64, Path, description = "Farcaster id"),
        MetadataQuery,
    ),
    responses(
        (status = 200, description = "Token metadata", body = TokenMetadata),
        (status = 400, description = "Invalid subject id", body = crate::error::ApiError),
    ),
))]
pub async fn get_metadata(
    State(config): State<Arc<ApiConfig>>,
    ApiPath(raw_subject): ApiPath<String>,
    ApiQuery(query): ApiQuery<MetadataQuery>,
) -> ApiResult<Json<TokenMetadata>> {
    let subject_id: SubjectId = raw_subject.parse()?;
    let user = params::optional_text(query.user);
    let label = user
        .clone()
        .unwrap_or_else(|| format!("FID {}", subject_id));

    let metadata = MetadataBuilder::new(subject_id, &label, &config.app_url)
        .image(hosted_image_url(&config.app_url, subject_id, user.as_deref()))
        .build();
    Ok(Json(metadata))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/metadata/:subject_id", get(get_metadata))
}
