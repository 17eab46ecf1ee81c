//! Plausibility Judge
//!
//! The oracle itself is opaque ([`PlausibilityJudge`]). This module owns the
//! two pieces of logic around it: deterministic prompt truncation and turning
//! the free-text assessment into a boolean.
//!
//! [`PlausibilityJudge`]: crate::types::PlausibilityJudge

pub mod llm_judge;

pub use llm_judge::LlmJudge;

use crate::types::JudgmentResult;

/// Keyword used when no keyword list is configured
pub const DEFAULT_AFFIRMING_KEYWORD: &str = "trustworthy";

/// First `max_chars` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Does the assessment affirm trust?
///
/// Case-insensitive substring search for [`DEFAULT_AFFIRMING_KEYWORD`].
pub fn interpret_judgment(assessment: &str) -> bool {
    interpret_judgment_with(assessment, &[DEFAULT_AFFIRMING_KEYWORD])
}

/// [`interpret_judgment`] with an explicit keyword list; any match affirms
///
/// Plain substring matching: "untrustworthy" contains "trustworthy".
pub fn interpret_judgment_with<S: AsRef<str>>(assessment: &str, keywords: &[S]) -> bool {
    let haystack = assessment.to_lowercase();
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .any(|k| haystack.contains(&k))
}

/// Pair an assessment with its derived trust signal
pub fn judgment_result<S: AsRef<str>>(assessment: String, keywords: &[S]) -> JudgmentResult {
    let affirms_trust = interpret_judgment_with(&assessment, keywords);
    JudgmentResult {
        assessment,
        affirms_trust,
    }
}
