//! Augmented chat handler

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    services::chat,
    AppState,
};

/// POST /api/chat request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: String,
    /// Ids of stored documents to use as context
    #[serde(default)]
    pub trusted_urls: Vec<String>,
    /// URLs to extract live and label as unchecked
    #[serde(default)]
    pub untrusted_urls: Vec<String>,
}

/// POST /api/chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /api/chat
pub async fn send_chat_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".to_string()));
    }

    let context = chat::gather_context(
        &state.db,
        state.pipeline.extractor(),
        &request.trusted_urls,
        &request.untrusted_urls,
    )
    .await?;

    tracing::debug!(
        trusted = request.trusted_urls.len(),
        unchecked = context.unchecked.len(),
        "Gathered chat context"
    );

    let response = chat::answer(state.chat_model.as_ref(), &request.prompt, &context).await?;
    Ok(Json(ChatResponse { response }))
}

/// Build chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(send_chat_message))
}
