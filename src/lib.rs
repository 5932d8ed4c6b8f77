//! Tegn - Transcript Topic Segmentation and Gloss
//!
//! A CLI tool and HTTP API for turning video transcripts into topic-labeled,
//! keyword-tagged sections with an optional ASL gloss rendering.
//!
//! The name "Tegn" comes from the Norwegian word for "sign."
//!
//! # Overview
//!
//! Tegn allows you to:
//! - Fetch captions for a YouTube video, with an automatic fallback provider
//! - Normalize raw caption segments into clean, ordered sentences
//! - Partition the sentences into coherent topics with ranked keywords
//! - Render each topic as ASL-style gloss notation
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript` - Transcript acquisition with provider fallback
//! - `normalize` - Transcript cleaning and sentence splitting
//! - `segment` - TF-IDF + k-means topic segmentation
//! - `gloss` - Gloss translation and per-topic orchestration
//! - `pipeline` - Stage coordination
//!
//! Each stage consumes the previous stage's output as a plain serializable
//! value, so stages can also be run independently from persisted artifacts.
//!
//! # Example
//!
//! ```rust,no_run
//! use tegn::config::Settings;
//! use tegn::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(&settings);
//!
//!     let result = pipeline.run("dQw4w9WgXcQ", Some(5)).await?;
//!     println!("{} topics", result.topics.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gloss;
pub mod normalize;
pub mod openai;
pub mod pipeline;
pub mod segment;
pub mod transcript;

pub use error::{Result, TegnError};
