//! CLI module for Tegn.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tegn - Transcript Topic Segmentation and Gloss
///
/// Turns video transcripts into topic-labeled sections with an optional ASL
/// gloss rendering. The name "Tegn" comes from the Norwegian word for "sign."
#[derive(Parser, Debug)]
#[command(name = "tegn")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transcript for a video
    Fetch {
        /// Video URL or id
        input: String,

        /// Write the segment artifact to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Clean a transcript into sentences
    Clean {
        /// Path to a segment artifact (JSON) or plain text file, '-' for stdin
        input: String,

        /// Treat the input as plain text instead of a segment artifact
        #[arg(long)]
        text: bool,

        /// Write the corpus artifact to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Segment a cleaned corpus into topics
    Segment {
        /// Path to a corpus artifact (JSON), '-' for stdin
        input: String,

        /// Number of topics (suggested from corpus size if omitted)
        #[arg(short, long)]
        topics: Option<usize>,

        /// Write the topic artifact to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Render gloss for topics or a single text
    Gloss {
        /// Path to a topic artifact (JSON), '-' for stdin
        #[arg(required_unless_present = "text")]
        input: Option<String>,

        /// Translate this text directly instead of a topic artifact
        #[arg(long)]
        text: Option<String>,

        /// Write the gloss artifact to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run the whole pipeline: fetch, clean, segment, gloss
    Process {
        /// Video URL or id
        input: String,

        /// Number of topics (suggested from corpus size if omitted)
        #[arg(short, long)]
        topics: Option<usize>,

        /// Write the full result artifact to a file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
