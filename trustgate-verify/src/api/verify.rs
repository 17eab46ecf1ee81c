//! Verification API handlers
//!
//! POST /api/query runs the pipeline only. POST /api/verify-url also records
//! the outcome in the document store.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use trustgate_common::db::{self, VerificationLevel, VerificationRun};
use uuid::Uuid;

use super::require_url;
use crate::{error::ApiResult, types::VerificationOutcome, AppState};

/// Request body shared by endpoints taking one URL
#[derive(Debug, Default, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Verdict and raw judge text
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    #[serde(rename = "Analysis")]
    pub analysis: String,
    #[serde(rename = "GPT_Analysis")]
    pub gpt_analysis: String,
}

/// POST /api/query response
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub output: QueryOutput,
    pub content: String,
    /// `[[reference_id, score], ...]`, descending by score
    #[serde(rename = "Matches")]
    pub matches: Vec<(String, f64)>,
}

impl From<VerificationOutcome> for QueryResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            output: QueryOutput {
                analysis: outcome.verdict.to_string(),
                gpt_analysis: outcome.judgment.assessment,
            },
            content: outcome.document.text,
            matches: outcome
                .matches
                .into_iter()
                .map(|m| (m.reference_id, m.score))
                .collect(),
        }
    }
}

/// POST /api/verify-url response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUrlResponse {
    pub success: bool,
    pub is_trusted: bool,
    pub verification_level: i64,
    /// A human-confirmed level was kept instead of the machine verdict
    pub preserved: bool,
    /// False when the outcome could not be written to the store
    pub persisted: bool,
}

/// Run the pipeline, noting failures for the health endpoint
pub(crate) async fn run_pipeline(state: &AppState, url: &str) -> ApiResult<VerificationOutcome> {
    match state.pipeline.verify_url(url).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            state.record_error(format!("{}: {}", e.kind(), e)).await;
            Err(e.into())
        }
    }
}

/// POST /api/query
///
/// Stateless verification of one URL.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<QueryResponse>> {
    let url = require_url(request.url.as_deref())?;
    let outcome = run_pipeline(&state, &url).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/verify-url
///
/// Verify, then record the result. Persistence is best effort: a storage
/// failure is logged and reported through `persisted` without touching the
/// verdict. Nothing is written in that case, so the level reported is the one
/// already on file, if any.
pub async fn verify_url(
    State(state): State<AppState>,
    Json(request): Json<UrlRequest>,
) -> ApiResult<Json<VerifyUrlResponse>> {
    let url = require_url(request.url.as_deref())?;
    let outcome = run_pipeline(&state, &url).await?;
    let is_trusted = outcome.verdict.is_trusted();

    let response = match persist_outcome(&state, &outcome).await {
        Ok(recorded) => VerifyUrlResponse {
            success: true,
            is_trusted,
            verification_level: recorded.verification_level.as_i64(),
            preserved: recorded.preserved,
            persisted: true,
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to record verification outcome");
            state.record_error(format!("persistence: {}", e)).await;
            let (level, preserved) = stored_level(&state, &url, is_trusted).await;
            VerifyUrlResponse {
                success: true,
                is_trusted,
                verification_level: level.as_i64(),
                preserved,
                persisted: false,
            }
        }
    };

    Ok(Json(response))
}

/// Level left in place after a failed write
///
/// A human-confirmed level on file counts as preserved. With no readable
/// row the machine verdict's level is reported.
async fn stored_level(
    state: &AppState,
    url: &str,
    is_trusted: bool,
) -> (VerificationLevel, bool) {
    match db::get_document(&state.db, url).await {
        Ok(Some(doc)) => {
            let level = doc.level();
            (level, level.is_human_confirmed())
        }
        Ok(None) | Err(_) => {
            let level = if is_trusted {
                VerificationLevel::MachineChecked
            } else {
                VerificationLevel::Untrusted
            };
            (level, false)
        }
    }
}

async fn persist_outcome(
    state: &AppState,
    outcome: &VerificationOutcome,
) -> trustgate_common::Result<db::RecordOutcome> {
    let matches: Vec<(&str, f64)> = outcome
        .matches
        .iter()
        .map(|m| (m.reference_id.as_str(), m.score))
        .collect();

    let run = VerificationRun {
        run_id: Uuid::new_v4(),
        document_id: outcome.document.id.clone(),
        verdict: outcome.verdict.to_string(),
        gpt_analysis: outcome.judgment.assessment.clone(),
        matches: serde_json::json!(matches),
        created_at: chrono::Utc::now(),
    };

    let recorded = db::record_verification(
        &state.db,
        &outcome.document.id,
        outcome.verdict.is_trusted(),
        &outcome.document.text,
        &outcome.judgment.assessment,
        &run,
    )
    .await?;

    tracing::info!(
        url = %outcome.document.id,
        run_id = %run.run_id,
        level = ?recorded.verification_level,
        preserved = recorded.preserved,
        "Recorded verification outcome"
    );

    Ok(recorded)
}

/// Build verification routes
pub fn verify_routes() -> Router<AppState> {
    Router::new()
        .route("/api/query", post(query))
        .route("/api/verify-url", post(verify_url))
}
