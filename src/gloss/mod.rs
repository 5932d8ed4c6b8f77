//! Gloss translation for Tegn.
//!
//! Converts topic text into ASL-style gloss notation through a pluggable
//! [`GlossTranslator`]. The orchestrator fans per-topic calls out with
//! bounded concurrency and tolerates per-topic failure: a topic whose
//! translation fails gets a deterministic placeholder and an
//! `available = false` flag instead of aborting the batch.

mod openai;
mod rules;

pub use openai::OpenAiGloss;
pub use rules::RuleBasedGloss;

use crate::config::GlossSettings;
use crate::error::GlossError;
use crate::segment::Topic;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

/// A topic paired with its gloss rendering.
///
/// One per input topic, in input order. `available = false` means the
/// translator could not process this topic and `gloss` holds the
/// placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossTopic {
    pub topic_id: u32,
    pub topic_name: String,
    pub gloss: String,
    pub available: bool,
}

/// Trait for gloss translation backends.
#[async_trait]
pub trait GlossTranslator: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Translate English text into gloss notation.
    async fn translate(&self, text: &str) -> std::result::Result<String, GlossError>;
}

/// Deterministic placeholder for topics the translator could not process.
/// Embeds the original text so downstream consumers still get content.
pub fn placeholder_gloss(text: &str) -> String {
    format!("[GLOSS UNAVAILABLE]\n\nOriginal text:\n{}", text)
}

/// Fans topic text through a [`GlossTranslator`] with bounded concurrency.
pub struct GlossOrchestrator {
    translator: Arc<dyn GlossTranslator>,
    max_concurrent: usize,
    timeout: Duration,
}

impl GlossOrchestrator {
    pub fn new(translator: Arc<dyn GlossTranslator>, settings: &GlossSettings) -> Self {
        Self {
            translator,
            max_concurrent: settings.max_concurrent.max(1),
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }

    /// Translate every topic, preserving input order and length.
    ///
    /// Failures and timeouts are recovered per topic; siblings keep running.
    #[instrument(skip_all, fields(topics = topics.len()))]
    pub async fn translate_topics(&self, topics: &[Topic]) -> Vec<GlossTopic> {
        let owned: Vec<(usize, u32, String, String)> = topics
            .iter()
            .enumerate()
            .map(|(position, topic)| (position, topic.id, topic.name.clone(), topic.text.clone()))
            .collect();
        let mut results: Vec<(usize, GlossTopic)> = stream::iter(owned)
            .map(|(position, topic_id, topic_name, text)| async move {
                let (gloss, available) = self.translate_one(&text).await;
                (
                    position,
                    GlossTopic {
                        topic_id,
                        topic_name,
                        gloss,
                        available,
                    },
                )
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        results.sort_by_key(|(position, _)| *position);
        results.into_iter().map(|(_, gloss)| gloss).collect()
    }

    /// Translate a single text, recovering failure into the placeholder.
    pub async fn translate_text(&self, text: &str) -> String {
        self.translate_one(text).await.0
    }

    async fn translate_one(&self, text: &str) -> (String, bool) {
        match tokio::time::timeout(self.timeout, self.translator.translate(text)).await {
            Ok(Ok(gloss)) => (gloss, true),
            Ok(Err(e)) => {
                warn!("{} failed: {}", self.translator.name(), e);
                (placeholder_gloss(text), false)
            }
            Err(_) => {
                warn!(
                    "{} timed out after {:?}",
                    self.translator.name(),
                    self.timeout
                );
                (placeholder_gloss(text), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Fails on the texts it is told to, succeeds on everything else.
    struct SelectiveTranslator {
        fail_on: Vec<String>,
    }

    #[async_trait]
    impl GlossTranslator for SelectiveTranslator {
        fn name(&self) -> &'static str {
            "selective"
        }

        async fn translate(&self, text: &str) -> std::result::Result<String, GlossError> {
            if self.fail_on.iter().any(|f| f == text) {
                Err(GlossError::Unavailable("backend refused".to_string()))
            } else {
                Ok(format!("GLOSS {}", text.to_uppercase()))
            }
        }
    }

    fn topic(id: u32, text: &str) -> Topic {
        Topic {
            id,
            name: format!("Topic {}", id),
            keywords: vec![],
            sentence_indices: BTreeSet::from([id as usize - 1]),
            text: text.to_string(),
        }
    }

    fn orchestrator(fail_on: Vec<String>) -> GlossOrchestrator {
        GlossOrchestrator::new(
            Arc::new(SelectiveTranslator { fail_on }),
            &GlossSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_translates_all_topics_in_order() {
        let topics = vec![topic(1, "one"), topic(2, "two"), topic(3, "three")];
        let glossed = orchestrator(vec![]).translate_topics(&topics).await;

        assert_eq!(glossed.len(), 3);
        for (g, t) in glossed.iter().zip(&topics) {
            assert_eq!(g.topic_id, t.id);
            assert!(g.available);
        }
        assert_eq!(glossed[0].gloss, "GLOSS ONE");
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_alignment() {
        let topics = vec![topic(1, "one"), topic(2, "two"), topic(3, "three")];
        let glossed = orchestrator(vec!["two".to_string()])
            .translate_topics(&topics)
            .await;

        assert_eq!(glossed.len(), 3);
        let availability: Vec<bool> = glossed.iter().map(|g| g.available).collect();
        assert_eq!(availability, vec![true, false, true]);

        // The failed topic carries the placeholder embedding its text.
        assert_eq!(glossed[1].topic_id, 2);
        assert!(glossed[1].gloss.contains("two"));
        assert!(glossed[1].gloss.starts_with("[GLOSS UNAVAILABLE]"));

        // Siblings still carry real output.
        assert_eq!(glossed[0].gloss, "GLOSS ONE");
        assert_eq!(glossed[2].gloss, "GLOSS THREE");
    }

    #[tokio::test]
    async fn test_all_failures_still_return_full_set() {
        let topics = vec![topic(1, "one"), topic(2, "two")];
        let glossed = orchestrator(vec!["one".to_string(), "two".to_string()])
            .translate_topics(&topics)
            .await;

        assert_eq!(glossed.len(), 2);
        assert!(glossed.iter().all(|g| !g.available));
    }

    #[tokio::test]
    async fn test_empty_topic_list() {
        let glossed = orchestrator(vec![]).translate_topics(&[]).await;
        assert!(glossed.is_empty());
    }

    #[tokio::test]
    async fn test_single_text_mode() {
        let orchestrator = orchestrator(vec!["bad".to_string()]);

        assert_eq!(orchestrator.translate_text("good").await, "GLOSS GOOD");
        assert!(orchestrator
            .translate_text("bad")
            .await
            .starts_with("[GLOSS UNAVAILABLE]"));
    }

    #[tokio::test]
    async fn test_timeout_recovers_to_placeholder() {
        struct SlowTranslator;

        #[async_trait]
        impl GlossTranslator for SlowTranslator {
            fn name(&self) -> &'static str {
                "slow"
            }

            async fn translate(&self, _text: &str) -> std::result::Result<String, GlossError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("never".to_string())
            }
        }

        let settings = GlossSettings {
            timeout_seconds: 0,
            ..GlossSettings::default()
        };
        let orchestrator = GlossOrchestrator::new(Arc::new(SlowTranslator), &settings);

        let topics = vec![topic(1, "slow one")];
        let glossed = orchestrator.translate_topics(&topics).await;

        assert_eq!(glossed.len(), 1);
        assert!(!glossed[0].available);
        assert!(glossed[0].gloss.contains("slow one"));
    }
}
