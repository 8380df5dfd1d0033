//! Share card for the daily wish.

use axum::{routing::post, Json, Router};
use nicebrick_render::{svg_data_url, ShareCard};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::routes::params;
use crate::state::AppState;

/// Body of `POST /api/share-image`. `wishText` and `date` are accepted as
/// aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ShareImageRequest {
    #[serde(alias = "wishText")]
    pub content_text: Option<String>,
    #[serde(alias = "date")]
    pub date_key: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ShareImageResponse {
    /// `data:image/svg+xml;base64,...`
    pub image_url: String,
    pub success: bool,
}

/// POST /api/share-image - Render the share card as a data URL
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/share-image",
    tag = "Share",
    request_body = ShareImageRequest,
    responses(
        (status = 200, description = "Share card", body = ShareImageResponse),
        (status = 400, description = "Missing content text or date", body = crate::error::ApiError),
    ),
))]
pub async fn create_share_image(
    ApiJson(req): ApiJson<ShareImageRequest>,
) -> ApiResult<Json<ShareImageResponse>> {
    let content_text = params::require("contentText", params::optional_text(req.content_text))?;
    let date_key = params::date_key(req.date_key.as_deref())?;
    let username = params::optional_text(req.username);

    let card = ShareCard {
        content_text: &content_text,
        date_key: date_key.as_str(),
        username: username.as_deref(),
    };

    Ok(Json(ShareImageResponse {
        image_url: svg_data_url(&card.render()),
        success: true,
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/share-image", post(create_share_image))
}
