//! Error types for Tegn.

use thiserror::Error;

/// Input validation failures. Hard errors, reported immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input contains no usable text")]
    EmptyInput,
}

impl ValidationError {
    /// Machine-readable kind tag for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingInput(_) => "missing_input",
            ValidationError::InvalidInput(_) => "invalid_input",
            ValidationError::EmptyInput => "empty_input",
        }
    }
}

/// Classification of a transcript acquisition failure.
///
/// The four kinds map to different user-facing remedies: `Disabled` and
/// `NotFound` mean picking another video, `RateLimited` means retrying
/// later, `Unknown` is everything the providers could not classify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Captions are disabled for this video: {0}")]
    Disabled(String),

    #[error("Video or transcript not found: {0}")]
    NotFound(String),

    #[error("Transcript provider is throttling requests: {0}")]
    RateLimited(String),

    #[error("Transcript fetch failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Machine-readable kind tag for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Disabled(_) => "disabled",
            FetchError::NotFound(_) => "not_found",
            FetchError::RateLimited(_) => "rate_limited",
            FetchError::Unknown(_) => "unknown",
        }
    }

    /// Rank used when both providers fail: a definitive classification
    /// (captions disabled, video gone) beats a generic one.
    pub(crate) fn specificity(&self) -> u8 {
        match self {
            FetchError::Disabled(_) => 3,
            FetchError::NotFound(_) => 2,
            FetchError::RateLimited(_) => 1,
            FetchError::Unknown(_) => 0,
        }
    }
}

/// Topic segmentation failures. Only degenerate input triggers these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("Not enough text to segment: {0}")]
    InsufficientText(String),
}

impl SegmentationError {
    /// Machine-readable kind tag for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            SegmentationError::InsufficientText(_) => "insufficient_text",
        }
    }
}

/// Gloss translation failures. Recorded per topic by the orchestrator and
/// recovered into a placeholder, never surfaced as a pipeline failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlossError {
    #[error("Gloss translator unavailable: {0}")]
    Unavailable(String),
}

/// Library-level error type for Tegn operations.
#[derive(Error, Debug)]
pub enum TegnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Gloss(#[from] GlossError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TegnError {
    /// Machine-readable kind tag for API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            TegnError::Config(_) => "config",
            TegnError::Validation(e) => e.kind(),
            TegnError::Fetch(e) => e.kind(),
            TegnError::Segmentation(e) => e.kind(),
            TegnError::Gloss(_) => "gloss_unavailable",
            TegnError::Io(_) => "io",
            TegnError::Json(_) => "json",
            TegnError::TomlParse(_) => "toml",
            TegnError::Http(_) => "http",
        }
    }
}

/// Result type alias for Tegn operations.
pub type Result<T> = std::result::Result<T, TegnError>;
