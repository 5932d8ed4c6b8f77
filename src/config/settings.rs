//! Configuration settings for Tegn.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub fetcher: FetcherSettings,
    pub segmentation: SegmentationSettings,
    pub gloss: GlossSettings,
    pub server: ServerSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Caption languages to try, in preference order.
    pub languages: Vec<String>,
    /// Per-call timeout for provider requests, in seconds.
    pub timeout_seconds: u64,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            timeout_seconds: 30,
        }
    }
}

/// Topic segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// Vocabulary size cap for the TF-IDF vectorizer.
    pub max_features: usize,
    /// Document-frequency cap; terms above it are dropped.
    pub max_df: f64,
    /// Clustering seed. Same corpus, topic count, and seed give the same
    /// partition.
    pub seed: u64,
    /// Ranked keywords kept per topic.
    pub keywords_per_topic: usize,
    /// Words per suggested topic when no count is requested.
    pub words_per_topic: usize,
    /// Lower bound for the suggested topic count.
    pub min_suggested_topics: usize,
    /// Upper bound for the suggested topic count.
    pub max_suggested_topics: usize,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            max_features: 100,
            max_df: 0.9,
            seed: 42,
            keywords_per_topic: 5,
            words_per_topic: 200,
            min_suggested_topics: 3,
            max_suggested_topics: 10,
        }
    }
}

/// Gloss translation provider type.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum GlossProvider {
    /// Deterministic rule-based conversion (default, no API required).
    #[default]
    Rules,
    /// LLM-backed conversion via the OpenAI API.
    OpenAi,
}

impl std::str::FromStr for GlossProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" | "rule" | "basic" => Ok(GlossProvider::Rules),
            "openai" | "llm" => Ok(GlossProvider::OpenAi),
            _ => Err(format!("Unknown gloss provider: {}", s)),
        }
    }
}

impl std::fmt::Display for GlossProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlossProvider::Rules => write!(f, "rules"),
            GlossProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Gloss translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossSettings {
    /// Gloss provider (rules, openai).
    pub provider: GlossProvider,
    /// LLM model for the openai provider.
    pub model: String,
    /// Maximum concurrent per-topic translation calls.
    pub max_concurrent: usize,
    /// Per-call timeout in seconds; a timed-out topic gets the placeholder.
    pub timeout_seconds: u64,
    /// Words per output line for the rule-based provider.
    pub words_per_line: usize,
}

impl Default for GlossSettings {
    fn default() -> Self {
        Self {
            provider: GlossProvider::Rules,
            model: "gpt-4o-mini".to_string(),
            max_concurrent: 4,
            timeout_seconds: 60,
            words_per_line: 10,
        }
    }
}

/// HTTP API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TegnError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tegn")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
