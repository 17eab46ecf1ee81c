//! TF-IDF vectorizer fit jointly over a small document set.
//!
//! Raw term counts, smoothed IDF `ln((1 + n) / (1 + df)) + 1`, L2-normalised
//! rows. Vocabulary indices follow first appearance so every step is
//! deterministic for the same input.

use std::collections::HashMap;

/// Sparse row: `(term index, weight)` sorted by term index
pub type SparseVector = Vec<(usize, f64)>;

/// Lowercase word tokens of at least two word characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Fit on `documents` and return one normalised vector per document
pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Vec<SparseVector> {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(tokenized.len());
    for tokens in &tokenized {
        let mut row: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            let next = vocabulary.len();
            let index = *vocabulary.entry(token.as_str()).or_insert(next);
            *row.entry(index).or_insert(0) += 1;
        }
        counts.push(row);
    }

    // Document frequency per term
    let mut df = vec![0usize; vocabulary.len()];
    for row in &counts {
        for &index in row.keys() {
            df[index] += 1;
        }
    }

    let n_docs = documents.len() as f64;
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    counts
        .into_iter()
        .map(|row| {
            let mut vector: SparseVector = row
                .into_iter()
                .map(|(index, count)| (index, count as f64 * idf[index]))
                .collect();
            vector.sort_by_key(|&(index, _)| index);
            l2_normalize(&mut vector);
            vector
        })
        .collect()
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm < f64::EPSILON {
        vector.clear();
        return;
    }
    for (_, w) in vector.iter_mut() {
        *w /= norm;
    }
}

/// Cosine similarity of two L2-normalised sparse vectors, clamped to [0, 1]
///
/// Zero vectors (no tokens) score 0.0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0f64;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}
