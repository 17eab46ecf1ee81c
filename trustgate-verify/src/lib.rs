//! trustgate-verify library interface
//!
//! Exposes the verification pipeline and HTTP router for the binary and for
//! integration testing.

pub mod api;
pub mod error;
pub mod extractors;
pub mod judge;
pub mod scoring;
pub mod services;
pub mod types;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};
pub use crate::workflow::TrustPipeline;

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::ChatCompletion;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Verified-document store
    pub db: SqlitePool,
    /// Decision engine for `/api/query` and friends
    pub pipeline: Arc<TrustPipeline>,
    /// Model answering augmented chat requests
    pub chat_model: Arc<dyn ChatCompletion>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        pipeline: Arc<TrustPipeline>,
        chat_model: Arc<dyn ChatCompletion>,
    ) -> Self {
        Self {
            db,
            pipeline,
            chat_model,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember a failure for GET /health
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::verify_routes())
        .merge(api::spot_check_routes())
        .merge(api::document_routes())
        .merge(api::content_routes())
        .merge(api::chat_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
