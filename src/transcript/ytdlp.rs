//! Fallback transcript provider backed by yt-dlp.
//!
//! Shells out to `yt-dlp --dump-json` for the video metadata, then downloads
//! the `json3` subtitle track it advertises. Slower than the timedtext API
//! but survives player response changes that break the primary provider.

use super::{classify_http_error, parse_json3, watch_url, TranscriptProvider, TranscriptSegment};
use crate::config::FetcherSettings;
use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Transcript provider that drives the yt-dlp binary.
pub struct YtDlpProvider {
    client: reqwest::Client,
    languages: Vec<String>,
    timeout: Duration,
}

impl YtDlpProvider {
    pub fn new(settings: &FetcherSettings) -> Self {
        let timeout = Duration::from_secs(settings.timeout_seconds);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            languages: settings.languages.clone(),
            timeout,
        }
    }

    /// Find the json3 subtitle URL for the first configured language,
    /// preferring authored subtitles over automatic captions.
    fn select_subtitle_url(&self, info: &serde_json::Value) -> Option<String> {
        for source in ["subtitles", "automatic_captions"] {
            for lang in &self.languages {
                let Some(entries) = info[source][lang.as_str()].as_array() else {
                    continue;
                };

                let url = entries
                    .iter()
                    .find(|e| e["ext"].as_str() == Some("json3"))
                    .and_then(|e| e["url"].as_str());

                if let Some(url) = url {
                    return Some(url.to_string());
                }
            }
        }
        None
    }
}

/// Classify a yt-dlp stderr message.
fn classify_stderr(stderr: &str) -> FetchError {
    if stderr.contains("Video unavailable")
        || stderr.contains("Private video")
        || stderr.contains("This video is not available")
    {
        FetchError::NotFound(format!("yt-dlp: {}", last_line(stderr)))
    } else if stderr.contains("HTTP Error 429") || stderr.contains("Sign in to confirm") {
        FetchError::RateLimited(format!("yt-dlp: {}", last_line(stderr)))
    } else {
        FetchError::Unknown(format!("yt-dlp failed: {}", last_line(stderr)))
    }
}

/// yt-dlp prints the decisive error on its final line.
fn last_line(s: &str) -> &str {
    s.lines().last().unwrap_or(s).trim()
}

#[async_trait]
impl TranscriptProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, video_id: &str) -> std::result::Result<Vec<TranscriptSegment>, FetchError> {
        let url = watch_url(video_id);

        let mut command = tokio::process::Command::new("yt-dlp");
        command.args([
            "--dump-json",
            "--no-download",
            "--no-warnings",
            "--sub-langs",
            &self.languages.join(","),
            &url,
        ]);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| FetchError::Unknown("yt-dlp timed out".to_string()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FetchError::Unknown("yt-dlp is not installed".to_string())
                } else {
                    FetchError::Unknown(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_stderr(&stderr));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| FetchError::Unknown(format!("Failed to parse yt-dlp output: {}", e)))?;

        let subtitle_url = self.select_subtitle_url(&info).ok_or_else(|| {
            FetchError::Disabled(format!(
                "No subtitles or automatic captions for languages {:?}",
                self.languages
            ))
        })?;

        debug!("Downloading json3 subtitles for {} via yt-dlp", video_id);

        let payload = self
            .client
            .get(&subtitle_url)
            .send()
            .await
            .map_err(|e| classify_http_error(&e, "subtitle request"))?
            .text()
            .await
            .map_err(|e| classify_http_error(&e, "subtitle body"))?;

        parse_json3(&payload)
    }
}
