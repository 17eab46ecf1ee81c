//! HTTP API handlers for trustgate-verify
//!
//! JSON over HTTP. Verification endpoints run the pipeline; document and
//! spot-check endpoints read and update the verified-document store.

pub mod chat;
pub mod content;
pub mod documents;
pub mod health;
pub mod spot_check;
pub mod verify;

pub use chat::chat_routes;
pub use content::content_routes;
pub use documents::document_routes;
pub use health::health_routes;
pub use spot_check::spot_check_routes;
pub use verify::verify_routes;

use crate::error::{ApiError, ApiResult};

/// Validate a caller-supplied URL
///
/// Missing, blank and unparseable URLs are rejected with 400 before any
/// outbound request is made.
pub(crate) fn require_url(url: Option<&str>) -> ApiResult<String> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("URL is required".to_string()))?;

    reqwest::Url::parse(url)
        .map_err(|e| ApiError::BadRequest(format!("Invalid URL format: {}", e)))?;

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_url() {
        assert_eq!(
            require_url(Some(" https://example.org/a ")).unwrap(),
            "https://example.org/a"
        );
        assert!(matches!(require_url(None), Err(ApiError::BadRequest(_))));
        assert!(matches!(require_url(Some("  ")), Err(ApiError::BadRequest(_))));
        assert!(matches!(
            require_url(Some("not a url")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
