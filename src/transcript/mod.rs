//! Transcript acquisition for Tegn.
//!
//! Provides a trait-based interface for transcript providers and a fetcher
//! that tries them in order with a single fallback.

mod fetcher;
mod timedtext;
mod ytdlp;

pub use fetcher::TranscriptFetcher;
pub use timedtext::TimedTextProvider;
pub use ytdlp::YtDlpProvider;

use crate::error::FetchError;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single raw transcript segment as acquired from a provider.
///
/// Segments are ordered ascending by `start_ms`; `index` is contiguous and
/// 1-based. Produced once by the fetcher and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// 1-based position within the transcript.
    pub index: u32,
    /// Start time in milliseconds.
    pub start_ms: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Caption text for this segment.
    pub text: String,
}

impl TranscriptSegment {
    /// Start time in seconds, as exposed on the wire.
    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// Duration in seconds, as exposed on the wire.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

/// Join segment texts into the full transcript text.
pub fn full_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trait for transcript providers.
///
/// A provider either returns the complete ordered segment list for a video
/// or a classified [`FetchError`]. At least two implementations exist so the
/// fetcher's fallback policy is meaningful.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch all transcript segments for a video id.
    async fn fetch(&self, video_id: &str) -> std::result::Result<Vec<TranscriptSegment>, FetchError>;
}

/// Extract a YouTube video id from a URL or bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    // Matches various YouTube URL formats and bare video IDs
    let video_id_regex = Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.)?
            (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video ID (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex");

    let caps = video_id_regex.captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Parse YouTube's `json3` caption payload into ordered segments.
///
/// Both providers end up downloading this format, so the parsing lives here.
pub(crate) fn parse_json3(payload: &str) -> std::result::Result<Vec<TranscriptSegment>, FetchError> {
    #[derive(Deserialize)]
    struct Json3 {
        #[serde(default)]
        events: Vec<Json3Event>,
    }

    #[derive(Deserialize)]
    struct Json3Event {
        #[serde(rename = "tStartMs", default)]
        start_ms: u64,
        #[serde(rename = "dDurationMs", default)]
        duration_ms: u64,
        #[serde(default)]
        segs: Option<Vec<Json3Seg>>,
    }

    #[derive(Deserialize)]
    struct Json3Seg {
        #[serde(default)]
        utf8: String,
    }

    let parsed: Json3 = serde_json::from_str(payload)
        .map_err(|e| FetchError::Unknown(format!("Failed to parse caption payload: {}", e)))?;

    let mut segments: Vec<TranscriptSegment> = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.into_iter().map(|s| s.utf8).collect();
            let text = text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some((event.start_ms, event.duration_ms, text))
        })
        .enumerate()
        .map(|(i, (start_ms, duration_ms, text))| TranscriptSegment {
            index: i as u32 + 1,
            start_ms,
            duration_ms,
            text,
        })
        .collect();

    segments.sort_by_key(|s| s.start_ms);
    for (i, segment) in segments.iter_mut().enumerate() {
        segment.index = i as u32 + 1;
    }

    Ok(segments)
}

/// Classify a reqwest error into a [`FetchError`].
pub(crate) fn classify_http_error(err: &reqwest::Error, context: &str) -> FetchError {
    if err.is_timeout() {
        return FetchError::Unknown(format!("{} timed out", context));
    }

    match err.status() {
        Some(status) if status.as_u16() == 429 => {
            FetchError::RateLimited(format!("{} returned HTTP 429", context))
        }
        Some(status) if status.as_u16() == 404 => {
            FetchError::NotFound(format!("{} returned HTTP 404", context))
        }
        _ => FetchError::Unknown(format!("{}: {}", context, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        // Test various URL formats
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );

        // Test invalid inputs
        assert_eq!(extract_video_id("not-a-video-id"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_parse_json3() {
        let payload = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "Hello "}, {"utf8": "world."}]},
                {"tStartMs": 2000, "dDurationMs": 1500},
                {"tStartMs": 3500, "dDurationMs": 1000, "segs": [{"utf8": "   "}]},
                {"tStartMs": 4500, "dDurationMs": 2500, "segs": [{"utf8": "Second line."}]}
            ]
        }"#;

        let segments = parse_json3(payload).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[0].text, "Hello world.");
        assert_eq!(segments[0].start_ms, 0);
        assert_eq!(segments[1].index, 2);
        assert_eq!(segments[1].start_ms, 4500);
        assert_eq!(segments[1].duration_ms, 2500);
    }

    #[test]
    fn test_parse_json3_invalid() {
        assert!(parse_json3("not json").is_err());
    }

    #[test]
    fn test_full_text() {
        let segments = vec![
            TranscriptSegment {
                index: 1,
                start_ms: 0,
                duration_ms: 1000,
                text: "Hello".to_string(),
            },
            TranscriptSegment {
                index: 2,
                start_ms: 1000,
                duration_ms: 1000,
                text: "world".to_string(),
            },
        ];

        assert_eq!(full_text(&segments), "Hello world");
    }

    #[test]
    fn test_segment_seconds_conversion() {
        let segment = TranscriptSegment {
            index: 1,
            start_ms: 1500,
            duration_ms: 250,
            text: "x".to_string(),
        };

        assert_eq!(segment.start_seconds(), 1.5);
        assert_eq!(segment.duration_seconds(), 0.25);
    }
}
