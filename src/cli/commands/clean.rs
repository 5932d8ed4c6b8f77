//! Clean command implementation.

use super::{read_input, write_output};
use crate::cli::Output;
use crate::config::Settings;
use crate::normalize::RawTranscript;
use crate::pipeline::Pipeline;
use crate::transcript::TranscriptSegment;
use anyhow::Result;

/// Run the clean command.
pub async fn run_clean(
    input: &str,
    as_text: bool,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let pipeline = Pipeline::new(&settings);
    let content = read_input(input)?;

    let raw = if as_text {
        RawTranscript::Text(content)
    } else {
        let segments: Vec<TranscriptSegment> = serde_json::from_str(&content)?;
        RawTranscript::Segments(segments)
    };

    match pipeline.clean(&raw) {
        Ok(corpus) => {
            Output::success(&format!(
                "Cleaned transcript: {} words, {} sentences",
                corpus.word_count, corpus.sentence_count
            ));
            let artifact = serde_json::to_string_pretty(&corpus)?;
            write_output(output.as_deref(), &artifact)
        }
        Err(e) => {
            Output::error(&format!("Clean failed: {}", e));
            Err(e.into())
        }
    }
}
