//! Verdict gates
//!
//! Pure functions so each gate can be flipped independently in tests.

use crate::types::{SimilarityMatch, Verdict};

/// Similarity gate
///
/// Passes when the corpus is empty (no evidence either way, verdict deferred
/// to the judge) or when every retained match reaches `threshold`.
pub fn similarity_gate(corpus_size: usize, matches: &[SimilarityMatch], threshold: f64) -> bool {
    corpus_size == 0 || matches.iter().all(|m| m.score >= threshold)
}

/// Trusted iff both gates pass
pub fn decide(similarity_passed: bool, judgment_passed: bool) -> Verdict {
    if similarity_passed && judgment_passed {
        Verdict::Trusted
    } else {
        Verdict::Untrusted
    }
}
