//! Pipeline coordination for Tegn.
//!
//! Composes the four stages: fetch transcript, clean into sentences,
//! segment into topics, render gloss. Each stage is also exposed on its
//! own so a caller can resume from a previously persisted artifact. The
//! pipeline owns no state beyond its collaborators; every run is
//! request-scoped.

use crate::config::{GlossProvider, Settings};
use crate::error::{Result, ValidationError};
use crate::gloss::{GlossOrchestrator, GlossTopic, GlossTranslator, OpenAiGloss, RuleBasedGloss};
use crate::normalize::{CleanedCorpus, RawTranscript, TextNormalizer};
use crate::segment::{Topic, TopicSegmenter};
use crate::transcript::{extract_video_id, TranscriptFetcher, TranscriptSegment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// The complete result of a composed pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub video_id: String,
    pub segments: Vec<TranscriptSegment>,
    pub corpus: CleanedCorpus,
    pub topics: Vec<Topic>,
    pub gloss_topics: Vec<GlossTopic>,
}

/// Coordinates the transcript processing stages.
pub struct Pipeline {
    fetcher: TranscriptFetcher,
    normalizer: TextNormalizer,
    segmenter: TopicSegmenter,
    gloss: GlossOrchestrator,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    ///
    /// The gloss backend is chosen here, at construction time; the stages
    /// themselves never probe the environment.
    pub fn new(settings: &Settings) -> Self {
        let translator: Arc<dyn GlossTranslator> = match settings.gloss.provider {
            GlossProvider::Rules => Arc::new(RuleBasedGloss::new(settings.gloss.words_per_line)),
            GlossProvider::OpenAi => Arc::new(OpenAiGloss::new(&settings.gloss.model)),
        };

        Self {
            fetcher: TranscriptFetcher::new(&settings.fetcher),
            normalizer: TextNormalizer::new(),
            segmenter: TopicSegmenter::new(&settings.segmentation),
            gloss: GlossOrchestrator::new(translator, &settings.gloss),
        }
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        fetcher: TranscriptFetcher,
        normalizer: TextNormalizer,
        segmenter: TopicSegmenter,
        gloss: GlossOrchestrator,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            segmenter,
            gloss,
        }
    }

    /// Stage 1: fetch the transcript for a video URL or id.
    pub async fn fetch(&self, input: &str) -> Result<(String, Vec<TranscriptSegment>)> {
        let video_id = extract_video_id(input).ok_or_else(|| {
            ValidationError::InvalidInput(format!("Not a recognizable video URL or id: {}", input))
        })?;

        let segments = self.fetcher.fetch(&video_id).await?;
        Ok((video_id, segments))
    }

    /// Stage 2: clean raw transcript data into a sentence corpus.
    pub fn clean(&self, input: &RawTranscript) -> Result<CleanedCorpus> {
        self.normalizer.clean(input)
    }

    /// Stage 3: partition the corpus into topics. With no explicit count,
    /// the segmenter's suggestion is used.
    pub fn segment(&self, corpus: &CleanedCorpus, requested: Option<usize>) -> Result<Vec<Topic>> {
        let k = requested.unwrap_or_else(|| self.segmenter.suggest_topic_count(corpus));
        self.segmenter.segment(corpus, k)
    }

    /// Stage 4: render gloss for each topic, tolerating per-topic failure.
    pub async fn gloss_topics(&self, topics: &[Topic]) -> Vec<GlossTopic> {
        self.gloss.translate_topics(topics).await
    }

    /// Render gloss for a single free-standing text.
    pub async fn gloss_text(&self, text: &str) -> String {
        self.gloss.translate_text(text).await
    }

    /// Run all four stages end to end.
    ///
    /// Stops at the first hard failure (validation, fetch, segmentation);
    /// the gloss stage always completes with per-topic availability flags.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn run(&self, input: &str, requested_topics: Option<usize>) -> Result<PipelineResult> {
        let (video_id, segments) = self.fetch(input).await?;
        info!("Fetched {} segments for {}", segments.len(), video_id);

        let corpus = self.clean(&RawTranscript::Segments(segments.clone()))?;
        let topics = self.segment(&corpus, requested_topics)?;
        info!("Segmented into {} topics", topics.len());

        let gloss_topics = self.gloss_topics(&topics).await;

        Ok(PipelineResult {
            video_id,
            segments,
            corpus,
            topics,
            gloss_topics,
        })
    }
}
