//! Segment command implementation.

use super::{read_input, write_output};
use crate::cli::Output;
use crate::config::Settings;
use crate::normalize::CleanedCorpus;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the segment command.
pub async fn run_segment(
    input: &str,
    topics: Option<usize>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let pipeline = Pipeline::new(&settings);

    let content = read_input(input)?;
    let corpus: CleanedCorpus = serde_json::from_str(&content)?;

    match pipeline.segment(&corpus, topics) {
        Ok(topics) => {
            Output::success(&format!("Created {} topic sections", topics.len()));
            for topic in &topics {
                Output::topic(&topic.name, topic.sentence_indices.len(), &topic.keywords);
            }
            let artifact = serde_json::to_string_pretty(&topics)?;
            write_output(output.as_deref(), &artifact)
        }
        Err(e) => {
            Output::error(&format!("Segmentation failed: {}", e));
            Err(e.into())
        }
    }
}
