//! Vote casting and tally reads.
//!
//! Writes and reads are separate endpoints: `POST /api/vote` records a vote,
//! `GET /api/vote` only reads the tally.

use axum::{extract::State, routing::get, Json, Router};
use nicebrick_core::ContentCatalog;
use nicebrick_storage::VoteLedger;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::routes::params;
use crate::state::AppState;
use crate::telemetry::{metrics, VoteMetricOutcome};

// ============================================================================
// TYPES
// ============================================================================

/// Body of `POST /api/vote`.
///
/// `fid`, `wishIndex`, `vote` and `date` are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(alias = "fid")]
    pub subject_id: Option<u64>,
    #[serde(alias = "wishIndex")]
    pub index: Option<u64>,
    /// Exactly `like` or `dislike`.
    #[serde(alias = "vote")]
    pub vote_kind: Option<String>,
    #[serde(alias = "date")]
    pub date_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub likes: u64,
    pub dislikes: u64,
    /// Always true after a successful call.
    pub has_voted: bool,
    /// False on the call that recorded the vote, true on every repeat.
    pub already_voted: bool,
}

/// Query of `GET /api/vote`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct TallyQuery {
    /// `YYYY-MM-DD`; defaults to today (UTC).
    #[serde(alias = "date")]
    pub date_key: Option<String>,
    #[serde(alias = "wishIndex")]
    pub index: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub likes: u64,
    pub dislikes: u64,
    pub degraded: bool,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /api/vote - Record a like or dislike, once per subject
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/vote",
    tag = "Votes",
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote recorded or already present", body = CastVoteResponse),
        (status = 400, description = "Missing or malformed field", body = ApiError),
        (status = 503, description = "Vote store unavailable", body = ApiError),
    ),
))]
pub async fn cast_vote(
    State(catalog): State<ContentCatalog>,
    State(ledger): State<VoteLedger>,
    ApiJson(req): ApiJson<CastVoteRequest>,
) -> ApiResult<Json<CastVoteResponse>> {
    // Everything is validated before the store is touched.
    let subject_id = params::subject_from_u64(req.subject_id)?;
    let index = params::content_index(req.index, &catalog)?;
    let kind = params::vote_kind(req.vote_kind.as_deref())?;
    let date_key = params::date_key(req.date_key.as_deref())?;

    let outcome = match ledger.cast_vote(subject_id, &date_key, index, kind).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(metrics) = metrics() {
                metrics.record_vote(kind.as_str(), VoteMetricOutcome::Failed);
            }
            return Err(e.into());
        }
    };

    if let Some(metrics) = metrics() {
        let label = if outcome.recorded() {
            VoteMetricOutcome::Recorded
        } else {
            VoteMetricOutcome::Duplicate
        };
        metrics.record_vote(kind.as_str(), label);
    }

    Ok(Json(CastVoteResponse {
        likes: outcome.tally.likes,
        dislikes: outcome.tally.dislikes,
        has_voted: outcome.has_voted(),
        already_voted: outcome.already_voted,
    }))
}

/// GET /api/vote - Current tally for a content index
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/vote",
    tag = "Votes",
    params(TallyQuery),
    responses(
        (status = 200, description = "Current tally", body = TallyResponse),
        (status = 400, description = "Missing or malformed field", body = ApiError),
    ),
))]
pub async fn get_tally(
    State(catalog): State<ContentCatalog>,
    State(ledger): State<VoteLedger>,
    ApiQuery(query): ApiQuery<TallyQuery>,
) -> ApiResult<Json<TallyResponse>> {
    let date_key = params::date_key_or_today(query.date_key.as_deref())?;
    let index = params::content_index(query.index, &catalog)?;

    let read = ledger.get_tally(&date_key, index).await;
    if read.degraded {
        if let Some(metrics) = metrics() {
            metrics.record_store_fallback("tally");
        }
    }

    Ok(Json(TallyResponse {
        likes: read.value.likes,
        dislikes: read.value.dislikes,
        degraded: read.degraded,
    }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new().route("/vote", get(get_tally).post(cast_vote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_aliases() -> Result<(), serde_json::Error> {
        let req: CastVoteRequest = serde_json::from_value(serde_json::json!({
            "fid": 1,
            "wishIndex": 3,
            "vote": "like",
            "date": "2024-01-01",
        }))?;
        assert_eq!(req.subject_id, Some(1));
        assert_eq!(req.index, Some(3));
        assert_eq!(req.vote_kind.as_deref(), Some("like"));
        assert_eq!(req.date_key.as_deref(), Some("2024-01-01"));
        Ok(())
    }

    #[test]
    fn test_response_is_camel_case() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(CastVoteResponse {
            likes: 1,
            dislikes: 0,
            has_voted: true,
            already_voted: false,
        })?;
        assert_eq!(json["hasVoted"], true);
        assert_eq!(json["alreadyVoted"], false);
        Ok(())
    }
}
