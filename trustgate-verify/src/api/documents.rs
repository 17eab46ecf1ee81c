//! Verified-document store API handlers
//!
//! GET /api/documents, GET /api/documents/:id, GET /api/trusted-docs,
//! GET /api/trusted-doc

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use trustgate_common::db::{self, VerifiedDocument};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Placeholder the document table view shows for a missing common query
const NULL_QUERY: &str = "NULL";

/// GET /api/trusted-docs query
#[derive(Debug, Deserialize)]
pub struct TrustedDocsQuery {
    /// Minimum verification level; all documents when absent
    pub level: Option<String>,
}

/// GET /api/trusted-doc query
#[derive(Debug, Deserialize)]
pub struct TrustedDocQuery {
    pub url: Option<String>,
}

/// One entry of GET /api/trusted-docs
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDocSummary {
    pub id: String,
    pub trust_level: i64,
}

/// GET /api/trusted-doc response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDocResponse {
    pub id: String,
    pub content: Option<String>,
    pub trust_level: i64,
}

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<VerifiedDocument>>> {
    let documents = db::list_documents(&state.db)
        .await?
        .into_iter()
        .map(|mut doc| {
            doc.common_query.get_or_insert_with(|| NULL_QUERY.to_string());
            doc
        })
        .collect();

    Ok(Json(documents))
}

/// GET /api/documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VerifiedDocument>> {
    db::get_document(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {}", id)))
}

/// GET /api/trusted-docs?level=N
pub async fn list_trusted_docs(
    State(state): State<AppState>,
    Query(query): Query<TrustedDocsQuery>,
) -> ApiResult<Json<Vec<TrustedDocSummary>>> {
    let documents = match query.level.as_deref() {
        None => db::list_documents(&state.db).await?,
        Some(level) => {
            let min_level: i64 = level.trim().parse().map_err(|_| {
                ApiError::BadRequest(format!("Invalid trust level format: {}", level))
            })?;
            db::list_documents_min_level(&state.db, min_level).await?
        }
    };

    Ok(Json(
        documents
            .into_iter()
            .map(|doc| TrustedDocSummary {
                id: doc.id,
                trust_level: doc.verification_level,
            })
            .collect(),
    ))
}

/// GET /api/trusted-doc?url=
pub async fn get_trusted_doc(
    State(state): State<AppState>,
    Query(query): Query<TrustedDocQuery>,
) -> ApiResult<Json<TrustedDocResponse>> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("URL parameter is required".to_string()))?;

    let doc = db::get_document(&state.db, &url)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {}", url)))?;

    Ok(Json(TrustedDocResponse {
        id: doc.id,
        content: doc.content,
        trust_level: doc.verification_level,
    }))
}

/// Build document store routes
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/:id", get(get_document))
        .route("/api/trusted-docs", get(list_trusted_docs))
        .route("/api/trusted-doc", get(get_trusted_doc))
}
