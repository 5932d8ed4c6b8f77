//! Primary transcript provider: the YouTube timedtext API.
//!
//! Fetches the watch page, extracts the caption track list embedded in the
//! player response, and downloads the selected track in `json3` format.

use super::{classify_http_error, parse_json3, watch_url, TranscriptProvider, TranscriptSegment};
use crate::config::FetcherSettings;
use crate::error::FetchError;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// YouTube serves a consent wall to clients it does not recognize.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

/// A caption track entry from the player response.
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    /// "asr" marks auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Transcript provider backed by YouTube's timedtext captions.
pub struct TimedTextProvider {
    client: reqwest::Client,
    languages: Vec<String>,
    track_list_regex: Regex,
}

impl TimedTextProvider {
    pub fn new(settings: &FetcherSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        // The track objects nest braces but never brackets, so a non-greedy
        // match ends exactly at the closing bracket of the array.
        let track_list_regex =
            Regex::new(r#""captionTracks":(\[.*?\])"#).expect("Invalid regex");

        Self {
            client,
            languages: settings.languages.clone(),
            track_list_regex,
        }
    }

    /// Pull the caption track list out of the watch page HTML.
    fn extract_tracks(&self, body: &str) -> std::result::Result<Vec<CaptionTrack>, FetchError> {
        if body.contains(r#"class="g-recaptcha""#) {
            return Err(FetchError::RateLimited(
                "YouTube is requiring a captcha for this client".to_string(),
            ));
        }

        let Some(caps) = self.track_list_regex.captures(body) else {
            if body.contains(r#""status":"ERROR""#) || body.contains("Video unavailable") {
                return Err(FetchError::NotFound(
                    "Video is unavailable or does not exist".to_string(),
                ));
            }
            return Err(FetchError::Disabled(
                "Watch page carries no caption tracks".to_string(),
            ));
        };

        serde_json::from_str(&caps[1])
            .map_err(|e| FetchError::Unknown(format!("Failed to parse caption track list: {}", e)))
    }

    /// Pick the best track for the configured languages, preferring manually
    /// authored captions over auto-generated ones.
    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Option<&'a CaptionTrack> {
        for lang in &self.languages {
            let matching = tracks
                .iter()
                .filter(|t| t.language_code.starts_with(lang.as_str()));

            if let Some(track) = matching
                .clone()
                .find(|t| !t.is_generated())
                .or_else(|| matching.clone().next())
            {
                return Some(track);
            }
        }
        None
    }
}

#[async_trait]
impl TranscriptProvider for TimedTextProvider {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(&self, video_id: &str) -> std::result::Result<Vec<TranscriptSegment>, FetchError> {
        let page_url = watch_url(video_id);

        let response = self
            .client
            .get(&page_url)
            .send()
            .await
            .map_err(|e| classify_http_error(&e, "watch page request"))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited(
                "Watch page request returned HTTP 429".to_string(),
            ));
        }
        if status.as_u16() == 404 {
            return Err(FetchError::NotFound(format!(
                "Video {} does not exist",
                video_id
            )));
        }
        if !status.is_success() {
            return Err(FetchError::Unknown(format!(
                "Watch page request returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_http_error(&e, "watch page body"))?;

        let tracks = self.extract_tracks(&body)?;
        debug!("Found {} caption tracks for {}", tracks.len(), video_id);

        let track = self.select_track(&tracks).ok_or_else(|| {
            FetchError::Disabled(format!(
                "No caption track for languages {:?}",
                self.languages
            ))
        })?;

        let mut track_url = url::Url::parse(&track.base_url)
            .map_err(|e| FetchError::Unknown(format!("Invalid caption track URL: {}", e)))?;
        track_url.query_pairs_mut().append_pair("fmt", "json3");

        let payload = self
            .client
            .get(track_url)
            .send()
            .await
            .map_err(|e| classify_http_error(&e, "caption track request"))?
            .text()
            .await
            .map_err(|e| classify_http_error(&e, "caption track body"))?;

        parse_json3(&payload)
    }
}
