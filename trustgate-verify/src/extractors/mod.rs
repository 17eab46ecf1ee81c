//! Text Extractor: fetch a URL and reduce its markup to plain text

pub mod html_text;
pub mod http_fetcher;

pub use html_text::{extract_text, normalize_whitespace};
pub use http_fetcher::HttpFetcher;

use std::sync::Arc;

use crate::types::{ContentFetcher, Document, VerifyError};

/// Fetch + extract in one step
#[derive(Clone)]
pub struct TextExtractor {
    fetcher: Arc<dyn ContentFetcher>,
}

impl TextExtractor {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` and extract its narrative text
    ///
    /// Fails with `Fetch` when the request fails and `EmptyContent` when the
    /// page has no qualifying text.
    pub async fn extract(&self, url: &str) -> Result<Document, VerifyError> {
        let html = self.fetcher.fetch(url).await?;

        let text = extract_text(&html).ok_or_else(|| VerifyError::EmptyContent(url.to_string()))?;

        tracing::debug!(url = %url, chars = text.chars().count(), "Extracted page text");
        Ok(Document::new(url, text))
    }
}
