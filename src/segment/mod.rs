//! Topic segmentation for Tegn.
//!
//! Partitions a cleaned corpus into coherent topics: sentences are embedded
//! as TF-IDF vectors, clustered with seeded k-means, and re-numbered so the
//! cluster containing the earliest sentence becomes Topic 1. Keywords are
//! the top-weighted terms within each cluster.

mod kmeans;
mod stopwords;
mod tfidf;

pub use kmeans::KMeans;
pub use stopwords::is_stopword;
pub use tfidf::{tokenize, TfidfMatrix, TfidfVectorizer};

use crate::config::SegmentationSettings;
use crate::error::{Result, SegmentationError};
use crate::normalize::CleanedCorpus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

/// A coherent topic extracted from one segmentation call.
///
/// Across all topics of a call, `sentence_indices` partitions the corpus
/// index set exactly: no overlap, no omission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// 1-based id in narrative order: Topic 1 contains the earliest sentence.
    pub id: u32,
    /// Display name built from the top keywords.
    pub name: String,
    /// Ranked representative terms, at most five.
    pub keywords: Vec<String>,
    /// Corpus indices of the member sentences.
    pub sentence_indices: BTreeSet<usize>,
    /// Member sentences joined in original chronological order.
    pub text: String,
}

/// Topic segmenter with deterministic vectorization and clustering.
pub struct TopicSegmenter {
    max_features: usize,
    max_df: f64,
    seed: u64,
    keywords_per_topic: usize,
    words_per_topic: usize,
    min_suggested: usize,
    max_suggested: usize,
}

impl TopicSegmenter {
    pub fn new(settings: &SegmentationSettings) -> Self {
        Self {
            max_features: settings.max_features,
            max_df: settings.max_df,
            seed: settings.seed,
            keywords_per_topic: settings.keywords_per_topic,
            words_per_topic: settings.words_per_topic,
            min_suggested: settings.min_suggested_topics,
            max_suggested: settings.max_suggested_topics,
        }
    }

    /// Default topic count for callers that do not supply one: roughly one
    /// topic per 200 words, clamped to a sane range. Advisory only.
    pub fn suggest_topic_count(&self, corpus: &CleanedCorpus) -> usize {
        (corpus.word_count / self.words_per_topic).clamp(self.min_suggested, self.max_suggested)
    }

    /// Partition the corpus into up to `requested` topics.
    ///
    /// The effective count is clamped to `1..=sentence_count`. A
    /// single-sentence corpus yields one topic without clustering.
    #[instrument(skip(self, corpus), fields(sentences = corpus.sentence_count))]
    pub fn segment(&self, corpus: &CleanedCorpus, requested: usize) -> Result<Vec<Topic>> {
        if corpus.sentence_count == 0 {
            return Err(
                SegmentationError::InsufficientText("corpus has no sentences".to_string()).into(),
            );
        }

        let k = requested.clamp(1, corpus.sentence_count);
        info!(
            "Segmenting {} sentences into {} topics",
            corpus.sentence_count, k
        );

        if corpus.sentence_count == 1 {
            let sentence = &corpus.sentences[0];
            let keywords = self.single_sentence_keywords(&sentence.text);
            let name = topic_name(1, &keywords);
            return Ok(vec![Topic {
                id: 1,
                name,
                keywords,
                sentence_indices: BTreeSet::from([sentence.index]),
                text: sentence.text.clone(),
            }]);
        }

        let texts: Vec<String> = corpus.sentences.iter().map(|s| s.text.clone()).collect();
        let matrix = TfidfVectorizer::new(self.max_features, self.max_df)
            .fit_transform(&texts)
            .ok_or_else(|| {
                SegmentationError::InsufficientText(
                    "no informative terms after stopword filtering".to_string(),
                )
            })?;

        let labels = KMeans::new(k, self.seed).fit(&matrix.rows);

        // Group row positions by cluster label. Positions stay ascending, so
        // the first member of each group is also its earliest sentence.
        let mut clusters: HashMap<usize, Vec<usize>> = HashMap::new();
        for (pos, &label) in labels.iter().enumerate() {
            clusters.entry(label).or_default().push(pos);
        }

        // Final ids follow narrative order, not the arbitrary cluster labels.
        let mut ordered: Vec<Vec<usize>> = clusters.into_values().collect();
        ordered.sort_by_key(|members| members[0]);

        let topics = ordered
            .into_iter()
            .enumerate()
            .map(|(i, members)| {
                let id = i as u32 + 1;
                let keywords = top_keywords(&matrix, &members, self.keywords_per_topic);
                let name = topic_name(id, &keywords);
                let text = members
                    .iter()
                    .map(|&p| corpus.sentences[p].text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let sentence_indices = members
                    .iter()
                    .map(|&p| corpus.sentences[p].index)
                    .collect();

                Topic {
                    id,
                    name,
                    keywords,
                    sentence_indices,
                    text,
                }
            })
            .collect();

        Ok(topics)
    }

    fn single_sentence_keywords(&self, text: &str) -> Vec<String> {
        TfidfVectorizer::new(self.max_features, self.max_df)
            .fit_transform(&[text.to_string()])
            .map(|matrix| top_keywords(&matrix, &[0], self.keywords_per_topic))
            .unwrap_or_default()
    }
}

/// Rank terms by summed member weight, alphabetical on ties.
fn top_keywords(matrix: &TfidfMatrix, members: &[usize], cap: usize) -> Vec<String> {
    let mut weights = vec![0.0; matrix.vocabulary.len()];
    for &pos in members {
        for (w, x) in weights.iter_mut().zip(&matrix.rows[pos]) {
            *w += x;
        }
    }

    let mut ranked: Vec<usize> = (0..weights.len()).filter(|&t| weights[t] > 0.0).collect();
    ranked.sort_by(|&a, &b| {
        weights[b]
            .partial_cmp(&weights[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    ranked
        .into_iter()
        .take(cap)
        .map(|t| matrix.vocabulary[t].clone())
        .collect()
}

/// Display name from the leading keywords, e.g. "Topic 2: market, stock".
fn topic_name(id: u32, keywords: &[String]) -> String {
    if keywords.is_empty() {
        format!("Topic {}", id)
    } else {
        let head: Vec<&str> = keywords.iter().take(3).map(|k| k.as_str()).collect();
        format!("Topic {}: {}", id, head.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TegnError;

    fn segmenter() -> TopicSegmenter {
        TopicSegmenter::new(&SegmentationSettings::default())
    }

    fn corpus(texts: &[&str]) -> CleanedCorpus {
        CleanedCorpus::from_sentences(texts.iter().map(|t| t.to_string()).collect())
    }

    fn all_indices(topics: &[Topic]) -> BTreeSet<usize> {
        topics
            .iter()
            .flat_map(|t| t.sentence_indices.iter().copied())
            .collect()
    }

    #[test]
    fn test_empty_corpus_is_insufficient() {
        let err = segmenter().segment(&corpus(&[]), 3).unwrap_err();
        assert!(matches!(
            err,
            TegnError::Segmentation(SegmentationError::InsufficientText(_))
        ));
    }

    #[test]
    fn test_all_stopwords_is_insufficient() {
        let err = segmenter()
            .segment(&corpus(&["To be or not to be.", "And so it was."]), 2)
            .unwrap_err();
        assert!(matches!(
            err,
            TegnError::Segmentation(SegmentationError::InsufficientText(_))
        ));
    }

    #[test]
    fn test_single_sentence_skips_clustering() {
        let topics = segmenter()
            .segment(&corpus(&["Cats are wonderful mammals."]), 5)
            .unwrap();

        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].id, 1);
        assert_eq!(topics[0].text, "Cats are wonderful mammals.");
        assert_eq!(topics[0].sentence_indices, BTreeSet::from([0]));
        assert!(topics[0].keywords.contains(&"cats".to_string()));
    }

    #[test]
    fn test_clamping_to_sentence_count() {
        let c = corpus(&[
            "Cats are mammals.",
            "The stock market fell today.",
            "Paris has beautiful architecture.",
        ]);

        let topics = segmenter().segment(&c, 10).unwrap();

        assert_eq!(topics.len(), 3);
        for topic in &topics {
            assert_eq!(topic.sentence_indices.len(), 1);
        }
    }

    #[test]
    fn test_partition_invariant() {
        let c = corpus(&[
            "Cats are mammals.",
            "Dogs are mammals too.",
            "The stock market fell today.",
            "Markets often fall.",
            "Paris has beautiful architecture.",
            "The city builds new museums.",
        ]);

        let topics = segmenter().segment(&c, 3).unwrap();

        // No omission.
        assert_eq!(all_indices(&topics), (0..6).collect::<BTreeSet<_>>());
        // No overlap.
        let total: usize = topics.iter().map(|t| t.sentence_indices.len()).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_ordering_invariant() {
        let c = corpus(&[
            "Cats are mammals.",
            "Dogs are mammals too.",
            "The stock market fell today.",
            "Markets often fall.",
        ]);

        let topics = segmenter().segment(&c, 2).unwrap();

        for pair in topics.windows(2) {
            let first_min = pair[0].sentence_indices.iter().min().unwrap();
            let second_min = pair[1].sentence_indices.iter().min().unwrap();
            assert!(pair[0].id < pair[1].id);
            assert!(first_min < second_min);
        }
    }

    #[test]
    fn test_two_topic_scenario() {
        let c = corpus(&[
            "Cats are mammals.",
            "Dogs are mammals too.",
            "The stock market fell today.",
            "Markets often fall.",
        ]);

        let topics = segmenter().segment(&c, 2).unwrap();

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].id, 1);
        assert_eq!(topics[0].sentence_indices, BTreeSet::from([0, 1]));
        assert!(topics[0].keywords.contains(&"mammals".to_string()));

        assert_eq!(topics[1].id, 2);
        assert_eq!(topics[1].sentence_indices, BTreeSet::from([2, 3]));
        assert!(
            topics[1].keywords.contains(&"market".to_string())
                || topics[1].keywords.contains(&"markets".to_string())
        );

        // Member sentences are joined chronologically.
        assert_eq!(topics[0].text, "Cats are mammals. Dogs are mammals too.");
        assert_eq!(
            topics[1].text,
            "The stock market fell today. Markets often fall."
        );
    }

    #[test]
    fn test_deterministic() {
        let c = corpus(&[
            "Cats are mammals.",
            "Dogs are mammals too.",
            "The stock market fell today.",
            "Markets often fall.",
            "Paris has beautiful architecture.",
        ]);

        let a = segmenter().segment(&c, 3).unwrap();
        let b = segmenter().segment(&c, 3).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_keywords_capped_at_five() {
        let c = corpus(&[
            "Quantum computers use qubits superposition entanglement gates circuits.",
            "Classical computers use transistors logic memory caches buses.",
        ]);

        let topics = segmenter().segment(&c, 2).unwrap();
        for topic in &topics {
            assert!(topic.keywords.len() <= 5);
        }
    }

    #[test]
    fn test_suggest_topic_count() {
        let few_words = corpus(&["Cats are mammals."]);
        assert_eq!(segmenter().suggest_topic_count(&few_words), 3);

        // 1200 words should suggest six topics.
        let long_text = vec!["word"; 1200].join(" ");
        let c = CleanedCorpus::from_sentences(vec![long_text]);
        assert_eq!(segmenter().suggest_topic_count(&c), 6);
    }

    #[test]
    fn test_topic_name_format() {
        assert_eq!(topic_name(1, &[]), "Topic 1");
        assert_eq!(
            topic_name(2, &["market".to_string(), "stock".to_string()]),
            "Topic 2: market, stock"
        );
    }
}
