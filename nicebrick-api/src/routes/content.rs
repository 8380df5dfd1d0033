//! Today's content and its vote status.

use axum::{extract::State, routing::get, Json, Router};
use nicebrick_core::ContentCatalog;
use nicebrick_storage::VoteLedger;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extractors::ApiQuery;
use crate::routes::params;
use crate::state::AppState;
use crate::telemetry::metrics;

// ============================================================================
// TYPES
// ============================================================================

/// Query for the content endpoints. `fid` and `date` are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    /// Farcaster id of the viewer.
    #[serde(alias = "fid")]
    pub subject_id: Option<String>,
    /// `YYYY-MM-DD`; defaults to today (UTC).
    #[serde(alias = "date")]
    pub date_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub index: usize,
    pub content: String,
    pub date_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ContentStatusResponse {
    pub index: usize,
    pub content: String,
    pub date_key: String,
    pub has_voted: bool,
    pub likes: u64,
    pub dislikes: u64,
    /// True when the vote store could not be read and zeros are shown.
    pub degraded: bool,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /api/content - Today's content for a subject
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/content",
    tag = "Content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Selected content", body = ContentResponse),
        (status = 400, description = "Invalid subject or date", body = crate::error::ApiError),
    ),
))]
pub async fn get_content(
    State(catalog): State<ContentCatalog>,
    ApiQuery(query): ApiQuery<ContentQuery>,
) -> ApiResult<Json<ContentResponse>> {
    let subject_id = params::subject_from_str(query.subject_id.as_deref())?;
    let date_key = params::date_key_or_today(query.date_key.as_deref())?;
    let selection = catalog.select(subject_id, &date_key)?;

    Ok(Json(ContentResponse {
        index: selection.index,
        content: selection.content.to_string(),
        date_key: date_key.to_string(),
    }))
}

/// GET /api/content-status - Today's content with tally and vote flag
///
/// Never fails on store errors; the tally degrades to zero instead.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/content-status",
    tag = "Content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Content with vote status", body = ContentStatusResponse),
        (status = 400, description = "Invalid subject or date", body = crate::error::ApiError),
    ),
))]
pub async fn get_content_status(
    State(catalog): State<ContentCatalog>,
    State(ledger): State<VoteLedger>,
    ApiQuery(query): ApiQuery<ContentQuery>,
) -> ApiResult<Json<ContentStatusResponse>> {
    let subject_id = params::subject_from_str(query.subject_id.as_deref())?;
    let date_key = params::date_key_or_today(query.date_key.as_deref())?;
    let selection = catalog.select(subject_id, &date_key)?;

    let status = ledger.status(subject_id, &date_key, selection.index).await;
    if status.degraded {
        if let Some(metrics) = metrics() {
            metrics.record_store_fallback("status");
        }
    }

    Ok(Json(ContentStatusResponse {
        index: selection.index,
        content: selection.content.to_string(),
        date_key: date_key.to_string(),
        has_voted: status.value.has_voted,
        likes: status.value.tally.likes,
        dislikes: status.value.tally.dislikes,
        degraded: status.degraded,
    }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/content", get(get_content))
        .route("/content-status", get(get_content_status))
}
