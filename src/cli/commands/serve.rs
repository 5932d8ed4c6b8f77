//! HTTP API server exposing the pipeline stages.
//!
//! Routes and response shapes mirror the original transcript-processor API
//! so existing frontends keep working: each stage has its own endpoint plus
//! a composed `/api/process`.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::{TegnError, ValidationError};
use crate::gloss::GlossTopic;
use crate::normalize::{CleanedCorpus, RawTranscript};
use crate::pipeline::Pipeline;
use crate::segment::Topic;
use crate::transcript::{watch_url, TranscriptSegment};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    pipeline: Pipeline,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState {
        pipeline: Pipeline::new(&settings),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/transcript", post(transcript))
        .route("/api/clean", post(clean))
        .route("/api/segment", post(segment))
        .route("/api/gloss", post(gloss))
        .route("/api/process", post(process))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tegn API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Transcript", "POST /api/transcript");
    Output::kv("Clean", "POST /api/clean");
    Output::kv("Segment", "POST /api/segment");
    Output::kv("Gloss", "POST /api/gloss");
    Output::kv("Process", "POST /api/process");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct TranscriptRequest {
    #[serde(rename = "videoUrl", default)]
    video_url: String,
}

#[derive(Serialize)]
struct SegmentDto {
    index: u32,
    timestamp: f64,
    duration: f64,
    text: String,
}

impl From<&TranscriptSegment> for SegmentDto {
    fn from(segment: &TranscriptSegment) -> Self {
        Self {
            index: segment.index,
            timestamp: segment.start_seconds(),
            duration: segment.duration_seconds(),
            text: segment.text.clone(),
        }
    }
}

#[derive(Serialize)]
struct TranscriptBody {
    full: String,
    segments: Vec<SegmentDto>,
    #[serde(rename = "totalSegments")]
    total_segments: usize,
}

impl TranscriptBody {
    fn from_segments(segments: &[TranscriptSegment]) -> Self {
        Self {
            full: crate::transcript::full_text(segments),
            segments: segments.iter().map(SegmentDto::from).collect(),
            total_segments: segments.len(),
        }
    }
}

#[derive(Serialize)]
struct TranscriptResponse {
    success: bool,
    #[serde(rename = "videoId")]
    video_id: String,
    url: String,
    transcript: TranscriptBody,
}

#[derive(Deserialize)]
struct CleanRequest {
    #[serde(default)]
    transcript: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct CleanBody {
    success: bool,
    full_text: String,
    sentences: Vec<String>,
    word_count: usize,
    sentence_count: usize,
}

impl CleanBody {
    fn from_corpus(corpus: &CleanedCorpus) -> Self {
        Self {
            success: true,
            full_text: corpus.full_text(),
            sentences: corpus.sentences.iter().map(|s| s.text.clone()).collect(),
            word_count: corpus.word_count,
            sentence_count: corpus.sentence_count,
        }
    }
}

#[derive(Deserialize)]
struct SegmentRequest {
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(rename = "numTopics", default)]
    num_topics: Option<usize>,
}

#[derive(Serialize)]
struct TopicDto {
    topic_id: u32,
    topic_name: String,
    keywords: Vec<String>,
    text: String,
}

impl From<&Topic> for TopicDto {
    fn from(topic: &Topic) -> Self {
        Self {
            topic_id: topic.id,
            topic_name: topic.name.clone(),
            keywords: topic.keywords.clone(),
            text: topic.text.clone(),
        }
    }
}

#[derive(Serialize)]
struct SegmentResponse {
    success: bool,
    topics: Vec<TopicDto>,
    #[serde(rename = "numTopics")]
    num_topics: usize,
}

#[derive(Deserialize)]
struct GlossRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    topics: Option<Vec<GlossInputTopic>>,
}

/// Topic shape accepted by the gloss endpoint: the segment-stage wire
/// format, with everything but the text optional.
#[derive(Deserialize)]
struct GlossInputTopic {
    #[serde(default)]
    topic_id: Option<u32>,
    #[serde(default)]
    topic_name: Option<String>,
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GlossTextResponse {
    success: bool,
    gloss: String,
}

#[derive(Serialize)]
struct GlossTopicsResponse {
    success: bool,
    gloss_topics: Vec<GlossTopic>,
}

#[derive(Deserialize)]
struct ProcessRequest {
    #[serde(rename = "videoUrl", default)]
    video_url: String,
    #[serde(rename = "numTopics", default)]
    num_topics: Option<usize>,
}

#[derive(Serialize)]
struct ProcessResponse {
    success: bool,
    #[serde(rename = "videoId")]
    video_id: String,
    url: String,
    transcript: TranscriptBody,
    cleaned: CleanBody,
    topics: Vec<TopicDto>,
    gloss_topics: Vec<GlossTopic>,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    kind: &'static str,
}

/// Map an error to a status code and the machine-readable wire body.
fn error_response(err: &TegnError) -> (StatusCode, Json<ErrorResponse>) {
    use crate::error::FetchError;

    let status = match err {
        TegnError::Validation(_) => StatusCode::BAD_REQUEST,
        TegnError::Fetch(FetchError::Disabled(_)) | TegnError::Fetch(FetchError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        TegnError::Fetch(FetchError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
        TegnError::Fetch(FetchError::Unknown(_)) => StatusCode::BAD_GATEWAY,
        TegnError::Segmentation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            success: false,
            error: err.to_string(),
            kind: err.kind(),
        }),
    )
}

/// Fold the flexible `/api/clean` transcript shapes into a [`RawTranscript`]:
/// a bare string, a segment array, or an object carrying `segments`, `full`,
/// or `text`.
fn raw_transcript_from_value(value: &serde_json::Value) -> Result<RawTranscript, ValidationError> {
    match value {
        serde_json::Value::String(text) => Ok(RawTranscript::Text(text.clone())),
        serde_json::Value::Array(entries) => {
            let texts: Vec<&str> = entries
                .iter()
                .filter_map(|entry| match entry {
                    serde_json::Value::String(s) => Some(s.as_str()),
                    serde_json::Value::Object(map) => map.get("text").and_then(|t| t.as_str()),
                    _ => None,
                })
                .collect();

            if texts.is_empty() {
                return Err(ValidationError::InvalidInput(
                    "transcript array carries no text entries".to_string(),
                ));
            }
            Ok(RawTranscript::Text(texts.join(" ")))
        }
        serde_json::Value::Object(map) => {
            if let Some(segments) = map.get("segments") {
                raw_transcript_from_value(segments)
            } else if let Some(full) = map.get("full").and_then(|v| v.as_str()) {
                Ok(RawTranscript::Text(full.to_string()))
            } else if let Some(text) = map.get("text").and_then(|v| v.as_str()) {
                Ok(RawTranscript::Text(text.to_string()))
            } else {
                Err(ValidationError::InvalidInput(
                    "transcript object needs a segments, full, or text field".to_string(),
                ))
            }
        }
        _ => Err(ValidationError::InvalidInput(
            "unsupported transcript shape".to_string(),
        )),
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> impl IntoResponse {
    if req.video_url.trim().is_empty() {
        let err = ValidationError::MissingInput("videoUrl is required".to_string()).into();
        return error_response(&err).into_response();
    }

    match state.pipeline.fetch(req.video_url.trim()).await {
        Ok((video_id, segments)) => Json(TranscriptResponse {
            success: true,
            url: watch_url(&video_id),
            video_id,
            transcript: TranscriptBody::from_segments(&segments),
        })
        .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

async fn clean(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CleanRequest>,
) -> impl IntoResponse {
    let Some(value) = req.transcript.as_ref().filter(|v| !v.is_null()) else {
        let err = ValidationError::MissingInput("transcript data is required".to_string()).into();
        return error_response(&err).into_response();
    };

    let raw = match raw_transcript_from_value(value) {
        Ok(raw) => raw,
        Err(e) => return error_response(&e.into()).into_response(),
    };

    match state.pipeline.clean(&raw) {
        Ok(corpus) => Json(CleanBody::from_corpus(&corpus)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

async fn segment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SegmentRequest>,
) -> impl IntoResponse {
    if req.sentences.is_empty() {
        let err = ValidationError::MissingInput("sentences are required".to_string()).into();
        return error_response(&err).into_response();
    }

    let corpus = CleanedCorpus::from_sentences(req.sentences);

    match state.pipeline.segment(&corpus, req.num_topics) {
        Ok(topics) => Json(SegmentResponse {
            success: true,
            num_topics: topics.len(),
            topics: topics.iter().map(TopicDto::from).collect(),
        })
        .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

async fn gloss(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GlossRequest>,
) -> impl IntoResponse {
    // Single-text mode.
    if let Some(text) = req.text {
        if text.trim().is_empty() {
            let err = ValidationError::MissingInput("text is required".to_string()).into();
            return error_response(&err).into_response();
        }

        let gloss = state.pipeline.gloss_text(&text).await;
        return Json(GlossTextResponse {
            success: true,
            gloss,
        })
        .into_response();
    }

    // Topic batch mode.
    let Some(input_topics) = req.topics.filter(|t| !t.is_empty()) else {
        let err =
            ValidationError::MissingInput("either text or topics is required".to_string()).into();
        return error_response(&err).into_response();
    };

    let topics: Vec<Topic> = input_topics
        .into_iter()
        .enumerate()
        .map(|(i, t)| Topic {
            id: t.topic_id.unwrap_or(i as u32 + 1),
            name: t.topic_name.unwrap_or_else(|| format!("Topic {}", i + 1)),
            keywords: vec![],
            sentence_indices: BTreeSet::new(),
            text: t.text,
        })
        .collect();

    let gloss_topics = state.pipeline.gloss_topics(&topics).await;

    Json(GlossTopicsResponse {
        success: true,
        gloss_topics,
    })
    .into_response()
}

async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> impl IntoResponse {
    if req.video_url.trim().is_empty() {
        let err = ValidationError::MissingInput("videoUrl is required".to_string()).into();
        return error_response(&err).into_response();
    }

    match state
        .pipeline
        .run(req.video_url.trim(), req.num_topics)
        .await
    {
        Ok(result) => Json(ProcessResponse {
            success: true,
            url: watch_url(&result.video_id),
            video_id: result.video_id.clone(),
            transcript: TranscriptBody::from_segments(&result.segments),
            cleaned: CleanBody::from_corpus(&result.corpus),
            topics: result.topics.iter().map(TopicDto::from).collect(),
            gloss_topics: result.gloss_topics,
        })
        .into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_transcript_from_string() {
        let value = serde_json::json!("plain transcript text");
        assert!(matches!(
            raw_transcript_from_value(&value).unwrap(),
            RawTranscript::Text(t) if t == "plain transcript text"
        ));
    }

    #[test]
    fn test_raw_transcript_from_segment_array() {
        let value = serde_json::json!([
            {"index": 1, "timestamp": 0.0, "duration": 2.0, "text": "Hello."},
            {"index": 2, "timestamp": 2.0, "duration": 2.0, "text": "World."}
        ]);

        assert!(matches!(
            raw_transcript_from_value(&value).unwrap(),
            RawTranscript::Text(t) if t == "Hello. World."
        ));
    }

    #[test]
    fn test_raw_transcript_from_wrapper_object() {
        let value = serde_json::json!({"segments": [{"text": "Hi."}, {"text": "There."}]});
        assert!(matches!(
            raw_transcript_from_value(&value).unwrap(),
            RawTranscript::Text(t) if t == "Hi. There."
        ));

        let value = serde_json::json!({"full": "The whole thing."});
        assert!(matches!(
            raw_transcript_from_value(&value).unwrap(),
            RawTranscript::Text(t) if t == "The whole thing."
        ));

        let value = serde_json::json!({"text": "One segment."});
        assert!(matches!(
            raw_transcript_from_value(&value).unwrap(),
            RawTranscript::Text(t) if t == "One segment."
        ));
    }

    #[test]
    fn test_raw_transcript_rejects_unusable_shapes() {
        assert!(raw_transcript_from_value(&serde_json::json!(42)).is_err());
        assert!(raw_transcript_from_value(&serde_json::json!({"other": 1})).is_err());
        assert!(raw_transcript_from_value(&serde_json::json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_error_response_status_mapping() {
        use crate::error::FetchError;

        let (status, _) =
            error_response(&TegnError::Fetch(FetchError::Disabled("off".to_string())));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(&TegnError::Fetch(FetchError::RateLimited(
            "slow down".to_string(),
        )));
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, _) = error_response(&ValidationError::EmptyInput.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_wire_field_names() {
        let body = TranscriptBody {
            full: "Hello.".to_string(),
            segments: vec![SegmentDto {
                index: 1,
                timestamp: 0.0,
                duration: 2.0,
                text: "Hello.".to_string(),
            }],
            total_segments: 1,
        };
        let response = TranscriptResponse {
            success: true,
            video_id: "abc123def45".to_string(),
            url: watch_url("abc123def45"),
            transcript: body,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("videoId").is_some());
        assert!(json["transcript"].get("totalSegments").is_some());
        let segment = &json["transcript"]["segments"][0];
        for field in ["index", "timestamp", "duration", "text"] {
            assert!(segment.get(field).is_some(), "missing field {}", field);
        }
    }
}
