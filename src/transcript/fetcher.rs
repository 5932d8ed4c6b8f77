//! Transcript fetcher with provider fallback.

use super::{TimedTextProvider, TranscriptProvider, TranscriptSegment, YtDlpProvider};
use crate::config::FetcherSettings;
use crate::error::FetchError;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Fetches transcripts by trying an ordered list of providers.
///
/// The default configuration is the timedtext API first and yt-dlp as the
/// single fallback. The fallback only runs after the primary's outcome is
/// known; there are no retries beyond that. When every provider fails, the
/// most specific classification encountered is surfaced, so a definitive
/// "captions disabled" from either attempt wins over a generic failure.
pub struct TranscriptFetcher {
    providers: Vec<Arc<dyn TranscriptProvider>>,
}

impl TranscriptFetcher {
    /// Create a fetcher with the default provider order.
    pub fn new(settings: &FetcherSettings) -> Self {
        Self {
            providers: vec![
                Arc::new(TimedTextProvider::new(settings)),
                Arc::new(YtDlpProvider::new(settings)),
            ],
        }
    }

    /// Create a fetcher with a custom provider list.
    pub fn with_providers(providers: Vec<Arc<dyn TranscriptProvider>>) -> Self {
        Self { providers }
    }

    /// Fetch the transcript for a video id.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> std::result::Result<Vec<TranscriptSegment>, FetchError> {
        let mut most_specific: Option<FetchError> = None;

        for provider in &self.providers {
            match provider.fetch(video_id).await {
                Ok(segments) if !segments.is_empty() => {
                    info!(
                        "Fetched {} segments for {} via {}",
                        segments.len(),
                        video_id,
                        provider.name()
                    );
                    return Ok(segments);
                }
                Ok(_) => {
                    warn!("{} returned no caption content for {}", provider.name(), video_id);
                    most_specific = Some(prefer_specific(
                        most_specific,
                        FetchError::Disabled(format!(
                            "{} returned no caption content",
                            provider.name()
                        )),
                    ));
                }
                Err(e) => {
                    warn!("{} failed for {}: {}", provider.name(), video_id, e);
                    most_specific = Some(prefer_specific(most_specific, e));
                }
            }
        }

        Err(most_specific
            .unwrap_or_else(|| FetchError::Unknown("no transcript providers configured".to_string())))
    }
}

/// Keep whichever error carries the more specific classification. Ties keep
/// the earlier (primary) error.
fn prefer_specific(current: Option<FetchError>, candidate: FetchError) -> FetchError {
    match current {
        Some(cur) if cur.specificity() >= candidate.specificity() => cur,
        _ => candidate,
    }
}
