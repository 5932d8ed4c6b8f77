//! Fetch command implementation.

use super::write_output;
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;
use anyhow::Result;

/// Run the fetch command.
pub async fn run_fetch(input: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let pipeline = Pipeline::new(&settings);

    let spinner = Output::spinner("Fetching transcript...");
    let result = pipeline.fetch(input).await;
    spinner.finish_and_clear();

    match result {
        Ok((video_id, segments)) => {
            Output::success(&format!(
                "Fetched {} segments for {}",
                segments.len(),
                video_id
            ));
            let artifact = serde_json::to_string_pretty(&segments)?;
            write_output(output.as_deref(), &artifact)
        }
        Err(e) => {
            Output::error(&format!("Fetch failed: {}", e));
            Err(e.into())
        }
    }
}
