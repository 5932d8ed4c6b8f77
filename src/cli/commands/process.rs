//! Process command implementation: the composed pipeline.

use super::write_output;
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the process command.
pub async fn run_process(
    input: &str,
    topics: Option<usize>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let pipeline = Pipeline::new(&settings);

    Output::info(&format!("Processing: {}", input));
    let spinner = Output::spinner("Running pipeline...");
    let result = pipeline.run(input, topics).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            Output::header("Result");
            Output::kv("Video", &result.video_id);
            Output::kv("Segments", &result.segments.len().to_string());
            Output::kv("Words", &result.corpus.word_count.to_string());
            Output::kv("Sentences", &result.corpus.sentence_count.to_string());
            println!();

            for (topic, gloss) in result.topics.iter().zip(&result.gloss_topics) {
                Output::topic(&topic.name, topic.sentence_indices.len(), &topic.keywords);
                if !gloss.available {
                    Output::info("  (gloss unavailable, placeholder used)");
                }
            }

            if output.is_some() {
                let artifact = serde_json::to_string_pretty(&result)?;
                write_output(output.as_deref(), &artifact)?;
            }

            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Processing failed: {}", e));
            Err(e.into())
        }
    }
}
