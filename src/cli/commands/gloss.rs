//! Gloss command implementation.

use super::{read_input, write_output};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use crate::segment::Topic;
use anyhow::Result;

/// Run the gloss command.
pub async fn run_gloss(
    input: Option<String>,
    text: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    let pipeline = Pipeline::new(&settings);

    // Single-text mode translates directly and prints the gloss.
    if let Some(text) = text {
        let gloss = pipeline.gloss_text(&text).await;
        return write_output(output.as_deref(), &gloss);
    }

    let input = input.expect("clap requires input when --text is absent");
    let content = read_input(&input)?;
    let topics: Vec<Topic> = serde_json::from_str(&content)?;

    let spinner = Output::spinner("Rendering gloss...");
    let glossed = pipeline.gloss_topics(&topics).await;
    spinner.finish_and_clear();

    let unavailable = glossed.iter().filter(|g| !g.available).count();
    if unavailable > 0 {
        Output::info(&format!(
            "Rendered {} topics ({} with placeholder gloss)",
            glossed.len(),
            unavailable
        ));
    } else {
        Output::success(&format!("Rendered {} topics", glossed.len()));
    }

    let artifact = serde_json::to_string_pretty(&glossed)?;
    write_output(output.as_deref(), &artifact)
}
