//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trust tier of a stored document
///
/// Levels are ordered: a higher level was checked more thoroughly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VerificationLevel {
    /// Checked and rejected, or never checked
    Untrusted = 0,
    /// Passed the automated verification pipeline
    MachineChecked = 1,
    /// Confirmed by a person during an AI-assisted spot check
    SpotChecked = 2,
    /// Fully verified by a person
    HumanVerified = 3,
}

impl VerificationLevel {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Map a stored integer back to a level; unknown values count as untrusted
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => Self::MachineChecked,
            2 => Self::SpotChecked,
            3 => Self::HumanVerified,
            _ => Self::Untrusted,
        }
    }

    /// Levels at or above this one were confirmed by a person and are never
    /// downgraded by a machine verification
    pub fn is_human_confirmed(self) -> bool {
        self >= Self::SpotChecked
    }
}

/// Row of the `verified_documents` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDocument {
    /// Source URL
    pub id: String,
    pub verification_level: i64,
    pub query_count: i64,
    pub verification_priority: i64,
    pub common_query: Option<String>,
    /// Extracted text as of the last verification
    pub content: Option<String>,
    /// Raw judge assessment from the last verification
    pub gpt_analysis: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl VerifiedDocument {
    pub fn level(&self) -> VerificationLevel {
        VerificationLevel::from_i64(self.verification_level)
    }
}

/// Result of recording a machine verification against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Level stored after the write
    pub verification_level: VerificationLevel,
    /// True when an existing human-confirmed level was kept
    pub preserved: bool,
}

/// One pipeline run, appended to `verification_runs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRun {
    pub run_id: Uuid,
    pub document_id: String,
    /// "Trusted" or "Untrusted"
    pub verdict: String,
    pub gpt_analysis: String,
    /// `[[reference_id, score], ...]`
    pub matches: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
