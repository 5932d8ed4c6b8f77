//! TF-IDF sentence vectorization.
//!
//! Builds term-weighted vectors over a sentence corpus: term frequency
//! scaled by smoothed inverse document frequency, L2-normalized per
//! sentence. Vocabulary selection and component order are fully
//! deterministic so the downstream clustering is reproducible.

use super::stopwords::is_stopword;
use std::collections::{HashMap, HashSet};

/// Vectorized corpus: one dense row per sentence, aligned with `vocabulary`.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Vocabulary terms in alphabetical order, index-aligned with the
    /// components of each row.
    pub vocabulary: Vec<String>,
    /// One L2-normalized weight row per input sentence.
    pub rows: Vec<Vec<f64>>,
}

/// Lowercase alphanumeric tokenization with stopword filtering.
///
/// Tokens shorter than two characters are dropped, matching the common
/// `\w\w+` vectorizer convention.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !is_stopword(t))
        .map(|t| t.to_string())
        .collect()
}

/// TF-IDF vectorizer with bounded vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    max_df: f64,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, max_df: f64) -> Self {
        Self {
            max_features,
            max_df,
        }
    }

    /// Vectorize the sentences. Returns `None` when no term survives
    /// tokenization (everything was stopwords or too short).
    pub fn fit_transform(&self, sentences: &[String]) -> Option<TfidfMatrix> {
        let token_lists: Vec<Vec<String>> = sentences.iter().map(|s| tokenize(s)).collect();

        // Document frequency and total frequency per term.
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut total_freq: HashMap<&str, usize> = HashMap::new();
        for tokens in &token_lists {
            let unique: HashSet<&str> = tokens.iter().map(|t| t.as_str()).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
            for term in tokens {
                *total_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return None;
        }

        let n_docs = sentences.len();

        // Drop terms present in more than max_df of the documents, but only
        // when the cap leaves a non-empty vocabulary (tiny corpora would
        // otherwise lose every term).
        let mut candidates: Vec<&str> = doc_freq.keys().copied().collect();
        if n_docs > 1 {
            let capped: Vec<&str> = candidates
                .iter()
                .copied()
                .filter(|t| (doc_freq[t] as f64) <= self.max_df * n_docs as f64)
                .collect();
            if !capped.is_empty() {
                candidates = capped;
            }
        }

        // Keep the most frequent terms, alphabetical on ties, then order the
        // final vocabulary alphabetically.
        candidates.sort_unstable_by(|a, b| {
            total_freq[b]
                .cmp(&total_freq[a])
                .then_with(|| a.cmp(b))
        });
        candidates.truncate(self.max_features);
        candidates.sort_unstable();

        let vocabulary: Vec<String> = candidates.iter().map(|t| t.to_string()).collect();
        let term_index: HashMap<&str, usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, i))
            .collect();

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1.
        let idf: Vec<f64> = candidates
            .iter()
            .map(|t| ((1.0 + n_docs as f64) / (1.0 + doc_freq[t] as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<f64>> = token_lists
            .iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&i) = term_index.get(token.as_str()) {
                        row[i] += idf[i];
                    }
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Some(TfidfMatrix { vocabulary, rows })
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in row.iter_mut() {
            *x /= norm;
        }
    }
}
