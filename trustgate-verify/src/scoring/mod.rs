//! Similarity Scorer
//!
//! Scores one candidate text against every corpus entry in a TF-IDF space fit
//! over {candidate} ∪ corpus, and keeps the top-K matches.

pub mod tfidf;

use std::cmp::Ordering;

use crate::types::{CorpusEntry, SimilarityMatch};

/// Top-K corpus matches for `candidate`, descending by score
///
/// Returns `min(top_k, corpus.len())` matches. Equal scores keep corpus
/// insertion order. An empty corpus yields an empty result.
pub fn score_against_corpus(
    candidate: &str,
    corpus: &[CorpusEntry],
    top_k: usize,
) -> Vec<SimilarityMatch> {
    if corpus.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let documents: Vec<&str> = std::iter::once(candidate)
        .chain(corpus.iter().map(|entry| entry.text.as_str()))
        .collect();
    let vectors = tfidf::fit_transform(&documents);
    let Some((candidate_vector, reference_vectors)) = vectors.split_first() else {
        return Vec::new();
    };

    let mut matches: Vec<SimilarityMatch> = corpus
        .iter()
        .zip(reference_vectors)
        .map(|(entry, vector)| SimilarityMatch {
            reference_id: entry.id.clone(),
            score: tfidf::cosine_similarity(candidate_vector, vector),
        })
        .collect();

    // sort_by is stable: ties stay in corpus order
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches.truncate(top_k.min(corpus.len()));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[(&str, &str)]) -> Vec<CorpusEntry> {
        texts
            .iter()
            .map(|(id, text)| CorpusEntry::new(*id, *text))
            .collect()
    }

    #[test]
    fn test_empty_corpus_returns_no_matches() {
        assert!(score_against_corpus("anything at all", &[], 5).is_empty());
    }

    #[test]
    fn test_result_length_is_min_of_k_and_corpus() {
        let entries = corpus(&[("a", "red apples"), ("b", "green pears"), ("c", "red pears")]);
        assert_eq!(score_against_corpus("red apples", &entries, 5).len(), 3);
        assert_eq!(score_against_corpus("red apples", &entries, 2).len(), 2);
    }

    #[test]
    fn test_sorted_descending_and_bounded() {
        let entries = corpus(&[
            ("far", "completely unrelated words here"),
            ("near", "rust ownership and borrowing rules"),
            ("mid", "rust compiler"),
        ]);
        let matches = score_against_corpus("rust ownership and borrowing", &entries, 3);

        assert_eq!(matches[0].reference_id, "near");
        for pair in matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for m in &matches {
            assert!((0.0..=1.0).contains(&m.score));
        }
    }

    #[test]
    fn test_candidate_in_own_corpus_scores_one() {
        let text = "verified reference text about municipal water quality";
        let entries = corpus(&[("other", "something else entirely"), ("self", text)]);
        let matches = score_against_corpus(text, &entries, 5);

        assert_eq!(matches[0].reference_id, "self");
        assert!((matches[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let entries = corpus(&[
            ("first", "identical text"),
            ("unrelated", "nothing shared"),
            ("second", "identical text"),
        ]);
        let matches = score_against_corpus("identical text", &entries, 3);

        assert_eq!(matches[0].reference_id, "first");
        assert_eq!(matches[1].reference_id, "second");
        assert_eq!(matches[2].reference_id, "unrelated");
    }

    #[test]
    fn test_deterministic() {
        let entries = corpus(&[("a", "one two three"), ("b", "two three four"), ("c", "five")]);
        let first = score_against_corpus("one two four", &entries, 3);
        for _ in 0..10 {
            assert_eq!(score_against_corpus("one two four", &entries, 3), first);
        }
    }
}
