//! Core Types and Trait Definitions for trustgate-verify
//!
//! Defines the data flowing through the verification pipeline and the three
//! collaborator seams the pipeline depends on:
//! - [`ContentFetcher`]: URL → raw markup
//! - [`CorpusStore`]: snapshot of previously verified reference texts
//! - [`PlausibilityJudge`]: text → free-text assessment (opaque oracle)
//!
//! # Architecture
//! fetch → extract → (score against corpus ∥ judge) → decide

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Data Model
// ============================================================================

/// A candidate document extracted for one request
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Source locator (URL)
    pub id: String,
    /// Cleaned natural-language text
    pub text: String,
    pub extracted_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            extracted_at: Utc::now(),
        }
    }

    /// Length in characters, as used by the minimum-length gate
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Immutable reference text owned by the corpus store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub id: String,
    pub text: String,
}

impl CorpusEntry {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Score of the candidate against one corpus entry, in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub reference_id: String,
    pub score: f64,
}

/// Judge assessment plus the trust signal derived from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub assessment: String,
    pub affirms_trust: bool,
}

/// Final binary classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Trusted,
    Untrusted,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Trusted => "Trusted",
            Verdict::Untrusted => "Untrusted",
        }
    }

    pub fn is_trusted(&self) -> bool {
        matches!(self, Verdict::Trusted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the decision engine produced for one document
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub document: Document,
    pub verdict: Verdict,
    pub judgment: JudgmentResult,
    /// Top-K matches, descending by score; empty when the corpus is empty
    pub matches: Vec<SimilarityMatch>,
    pub similarity_passed: bool,
}

// ============================================================================
// Errors
// ============================================================================

/// Terminal failures of a verification run
///
/// None of these are retried; each surfaces to the caller with its own kind.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Transport failure or non-success HTTP status while fetching the page
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The page contained no qualifying text elements
    #[error("No extractable text content at {0}")]
    EmptyContent(String),

    /// Extracted text is below the minimum length
    #[error("Extracted text too short: {length} characters (minimum {minimum})")]
    TooShort { length: usize, minimum: usize },

    /// The plausibility oracle could not be reached or answered with an error
    #[error("Judge unavailable: {0}")]
    JudgeUnavailable(String),

    /// Reference corpus could not be read
    #[error("Corpus unavailable: {0}")]
    CorpusUnavailable(String),
}

impl VerifyError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::Fetch { .. } => "FETCH_ERROR",
            VerifyError::EmptyContent(_) => "EMPTY_CONTENT",
            VerifyError::TooShort { .. } => "TOO_SHORT",
            VerifyError::JudgeUnavailable(_) => "JUDGE_UNAVAILABLE",
            VerifyError::CorpusUnavailable(_) => "CORPUS_UNAVAILABLE",
        }
    }
}

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Fetches the raw markup of a document
#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fails with [`VerifyError::Fetch`] on transport errors and non-2xx statuses
    async fn fetch(&self, url: &str) -> Result<String, VerifyError>;
}

/// Read-only view of previously verified reference texts
#[async_trait::async_trait]
pub trait CorpusStore: Send + Sync {
    /// Point-in-time snapshot in insertion order
    ///
    /// `exclude_id` names the candidate so it is not compared with its own
    /// stored copy.
    async fn list_verified_texts(
        &self,
        exclude_id: Option<&str>,
    ) -> Result<Vec<CorpusEntry>, VerifyError>;
}

/// Opaque text-in/text-out trust oracle
///
/// Implementations receive already-truncated text.
#[async_trait::async_trait]
pub trait PlausibilityJudge: Send + Sync {
    /// Fails with [`VerifyError::JudgeUnavailable`] when the oracle call fails
    async fn judge(&self, text: &str, references: &[String]) -> Result<String, VerifyError>;
}
