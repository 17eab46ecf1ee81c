//! Human-in-the-loop verification handlers
//!
//! POST /api/manual-verify, POST /api/spot-check/start, POST /api/spot-check/verify

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use trustgate_common::db::{self, VerificationLevel};

use super::{require_url, verify::run_pipeline, verify::UrlRequest};
use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// POST /api/spot-check/start response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotCheckStartResponse {
    pub success: bool,
    /// "Trusted" or "Untrusted"
    pub analysis: String,
    pub gpt_analysis: String,
}

/// POST /api/spot-check/verify request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotCheckVerifyRequest {
    #[serde(default)]
    pub url: Option<String>,
    pub is_trusted: bool,
}

/// POST /api/manual-verify
///
/// Marks the URL as spot-checked, creating the document when unknown.
pub async fn manual_verify(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let url = require_url(request.url.as_deref())?;
    db::mark_manually_verified(&state.db, &url).await?;

    tracing::info!(url = %url, "Document manually verified");
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/spot-check/start
///
/// Runs the pipeline for a reviewer without recording anything.
pub async fn start_spot_check(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<SpotCheckStartResponse>> {
    let url = require_url(request.url.as_deref())?;
    let outcome = run_pipeline(&state, &url).await?;

    Ok(Json(SpotCheckStartResponse {
        success: true,
        analysis: outcome.verdict.to_string(),
        gpt_analysis: outcome.judgment.assessment,
    }))
}

/// POST /api/spot-check/verify
///
/// Applies the reviewer's decision: SpotChecked when trusted, Untrusted otherwise.
pub async fn finish_spot_check(
    State(state): State<AppState>,
    Json(request): Json<SpotCheckVerifyRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let url = require_url(request.url.as_deref())?;
    let level = if request.is_trusted {
        VerificationLevel::SpotChecked
    } else {
        VerificationLevel::Untrusted
    };

    if !db::set_verification_level(&state.db, &url, level).await? {
        return Err(ApiError::NotFound(format!("Document not found: {}", url)));
    }

    tracing::info!(url = %url, level = ?level, "Spot check recorded");
    Ok(Json(SuccessResponse { success: true }))
}

/// Build spot-check routes
pub fn spot_check_routes() -> Router<AppState> {
    Router::new()
        .route("/api/manual-verify", post(manual_verify))
        .route("/api/spot-check/start", post(start_spot_check))
        .route("/api/spot-check/verify", post(finish_spot_check))
}
