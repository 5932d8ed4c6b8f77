//! Transcript cleaning and sentence splitting.
//!
//! Turns raw caption segments (or an already-joined text blob) into a
//! [`CleanedCorpus`]: stage directions, conversation markers, and stray
//! timestamps removed, whitespace collapsed, text split into indexed
//! sentences. Cleaning is idempotent: running it over an already-clean
//! corpus changes nothing.

mod sentences;

pub use sentences::split_sentences;

use crate::error::{Result, ValidationError};
use crate::transcript::{self, TranscriptSegment};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw input accepted by the normalizer.
#[derive(Debug, Clone)]
pub enum RawTranscript {
    /// Timed segments as produced by the fetcher.
    Segments(Vec<TranscriptSegment>),
    /// Pre-joined transcript text.
    Text(String),
}

impl From<Vec<TranscriptSegment>> for RawTranscript {
    fn from(segments: Vec<TranscriptSegment>) -> Self {
        RawTranscript::Segments(segments)
    }
}

impl From<String> for RawTranscript {
    fn from(text: String) -> Self {
        RawTranscript::Text(text)
    }
}

impl From<&str> for RawTranscript {
    fn from(text: &str) -> Self {
        RawTranscript::Text(text.to_string())
    }
}

/// A normalized sentence with its position in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 0-based position; the join key used by topic segmentation.
    pub index: usize,
    pub text: String,
}

/// Cleaned transcript: ordered sentences plus corpus statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedCorpus {
    /// Sentences in original chronological order, indices contiguous from 0.
    pub sentences: Vec<Sentence>,
    /// Whitespace-delimited token count of the full cleaned text.
    pub word_count: usize,
    /// Number of sentences.
    pub sentence_count: usize,
}

impl CleanedCorpus {
    /// Build a corpus directly from already-clean sentence texts.
    ///
    /// Used when a caller resumes the pipeline from persisted sentences
    /// rather than from raw transcript data.
    pub fn from_sentences(texts: Vec<String>) -> Self {
        let sentences: Vec<Sentence> = texts
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .enumerate()
            .map(|(index, text)| Sentence { index, text })
            .collect();

        let full: String = sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            word_count: full.split_whitespace().count(),
            sentence_count: sentences.len(),
            sentences,
        }
    }

    /// Sentences joined back into the full cleaned text.
    pub fn full_text(&self) -> String {
        self.sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Transcript text normalizer.
pub struct TextNormalizer {
    marker_regex: Regex,
    bracket_regex: Regex,
    timestamp_regex: Regex,
    dots_regex: Regex,
    bangs_regex: Regex,
    questions_regex: Regex,
    whitespace_regex: Regex,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            // ">>" conversation markers
            marker_regex: Regex::new(r">>\s*").expect("Invalid regex"),
            // [Music], [Applause], and other stage directions
            bracket_regex: Regex::new(r"\[[^\]]*\]").expect("Invalid regex"),
            // stray 1:23 / 1:02:03 style timestamps
            timestamp_regex: Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?\b").expect("Invalid regex"),
            dots_regex: Regex::new(r"\.{2,}").expect("Invalid regex"),
            bangs_regex: Regex::new(r"!{2,}").expect("Invalid regex"),
            questions_regex: Regex::new(r"\?{2,}").expect("Invalid regex"),
            whitespace_regex: Regex::new(r"\s+").expect("Invalid regex"),
        }
    }

    /// Normalize raw transcript data into a [`CleanedCorpus`].
    ///
    /// Fails with [`ValidationError::EmptyInput`] when nothing survives
    /// cleaning.
    pub fn clean(&self, input: &RawTranscript) -> Result<CleanedCorpus> {
        let raw_text = match input {
            RawTranscript::Segments(segments) => transcript::full_text(segments),
            RawTranscript::Text(text) => text.clone(),
        };

        let cleaned = self.clean_text(&raw_text);

        let sentences: Vec<Sentence> = split_sentences(&cleaned)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Sentence { index, text })
            .collect();

        if sentences.is_empty() {
            return Err(ValidationError::EmptyInput.into());
        }

        let word_count = cleaned.split_whitespace().count();
        debug!(
            "Cleaned transcript: {} words, {} sentences",
            word_count,
            sentences.len()
        );

        Ok(CleanedCorpus {
            word_count,
            sentence_count: sentences.len(),
            sentences,
        })
    }

    /// Character-level cleanup, stable under repetition.
    fn clean_text(&self, text: &str) -> String {
        let text = self.marker_regex.replace_all(text, "");
        let text = self.bracket_regex.replace_all(&text, "");
        let text = self.timestamp_regex.replace_all(&text, "");
        let text = self.dots_regex.replace_all(&text, ".");
        let text = self.bangs_regex.replace_all(&text, "!");
        let text = self.questions_regex.replace_all(&text, "?");
        let text = self.whitespace_regex.replace_all(&text, " ");
        text.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TegnError;

    fn segment(index: u32, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            index,
            start_ms: (index as u64 - 1) * 1000,
            duration_ms: 1000,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_strips_markers_brackets_and_timestamps() {
        let normalizer = TextNormalizer::new();
        let corpus = normalizer
            .clean(&RawTranscript::from(
                ">> [Music] At 1:23 the cat appeared. [Applause] It sat down.",
            ))
            .unwrap();

        assert_eq!(corpus.sentences[0].text, "At the cat appeared.");
        assert_eq!(corpus.sentences[1].text, "It sat down.");
    }

    #[test]
    fn test_collapses_whitespace_and_punctuation() {
        let normalizer = TextNormalizer::new();
        let corpus = normalizer
            .clean(&RawTranscript::from("What??   Really!!   Yes...  Fine."))
            .unwrap();

        assert_eq!(
            corpus.full_text(),
            "What? Really! Yes. Fine."
        );
        assert_eq!(corpus.sentence_count, 4);
    }

    #[test]
    fn test_segments_and_text_inputs_agree() {
        let normalizer = TextNormalizer::new();

        let from_segments = normalizer
            .clean(&RawTranscript::Segments(vec![
                segment(1, "Cats are mammals."),
                segment(2, "Dogs are mammals too."),
            ]))
            .unwrap();

        let from_text = normalizer
            .clean(&RawTranscript::from("Cats are mammals. Dogs are mammals too."))
            .unwrap();

        assert_eq!(from_segments, from_text);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let normalizer = TextNormalizer::new();
        let raw = ">> [Music] Cats are mammals!!  Dogs are...  mammals too. 0:42";

        let once = normalizer.clean(&RawTranscript::from(raw)).unwrap();
        let twice = normalizer
            .clean(&RawTranscript::from(once.full_text()))
            .unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_sentence_indices_are_contiguous() {
        let normalizer = TextNormalizer::new();
        let corpus = normalizer
            .clean(&RawTranscript::from("One. Two. Three."))
            .unwrap();

        let indices: Vec<usize> = corpus.sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(corpus.sentence_count, 3);
        assert_eq!(corpus.word_count, 3);
    }

    #[test]
    fn test_empty_input_fails() {
        let normalizer = TextNormalizer::new();

        for raw in ["", "   ", "[Music] [Applause]", ">> >>"] {
            let err = normalizer.clean(&RawTranscript::from(raw)).unwrap_err();
            assert!(
                matches!(err, TegnError::Validation(ValidationError::EmptyInput)),
                "expected EmptyInput for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_from_sentences() {
        let corpus = CleanedCorpus::from_sentences(vec![
            "Cats are mammals.".to_string(),
            "  ".to_string(),
            "Dogs bark.".to_string(),
        ]);

        assert_eq!(corpus.sentence_count, 2);
        assert_eq!(corpus.sentences[1].index, 1);
        assert_eq!(corpus.word_count, 5);
    }
}
