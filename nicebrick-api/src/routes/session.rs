//! Caller identity with the disconnected-mode fallback.

use axum::{routing::get, Json, Router};
use nicebrick_core::ResolvedIdentity;

use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// GET /api/session - The caller's Farcaster identity
///
/// Falls back to the demo identity (`mode: "mock"`) when the host did not
/// forward one.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/session",
    tag = "Meta",
    params(
        ("x-farcaster-fid" = Option<u64>, Header, description = "Caller fid"),
        ("x-farcaster-username" = Option<String>, Header, description = "Caller username"),
        ("x-farcaster-display-name" = Option<String>, Header, description = "Caller display name"),
        ("x-farcaster-pfp-url" = Option<String>, Header, description = "Caller avatar URL"),
    ),
    responses(
        (status = 200, description = "Resolved identity", body = ResolvedIdentity),
    ),
))]
pub async fn get_session(CallerIdentity(provided): CallerIdentity) -> Json<ResolvedIdentity> {
    let resolved = ResolvedIdentity::resolve(provided);
    if resolved.is_mock() {
        tracing::debug!("No caller identity forwarded, using fallback identity");
    }
    Json(resolved)
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/session", get(get_session))
}
