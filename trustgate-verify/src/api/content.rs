//! Page content extraction handler

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use super::{require_url, verify::UrlRequest};
use crate::{error::ApiResult, AppState};

/// POST /api/page-content response
#[derive(Debug, Serialize)]
pub struct PageContentResponse {
    pub text: String,
}

/// POST /api/page-content
///
/// Fetch and extract a page without verifying it.
pub async fn page_content(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<PageContentResponse>> {
    let url = require_url(request.url.as_deref())?;
    let document = state.pipeline.extractor().extract(&url).await?;

    Ok(Json(PageContentResponse {
        text: document.text,
    }))
}

/// Build content routes
pub fn content_routes() -> Router<AppState> {
    Router::new().route("/api/page-content", post(page_content))
}
