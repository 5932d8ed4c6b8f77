//! Tegn CLI entry point.

use anyhow::Result;
use clap::Parser;
use tegn::cli::{commands, Cli, Commands};
use tegn::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tegn={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Fetch { input, output } => {
            commands::run_fetch(input, output.clone(), settings).await?;
        }

        Commands::Clean {
            input,
            text,
            output,
        } => {
            commands::run_clean(input, *text, output.clone(), settings).await?;
        }

        Commands::Segment {
            input,
            topics,
            output,
        } => {
            commands::run_segment(input, *topics, output.clone(), settings).await?;
        }

        Commands::Gloss {
            input,
            text,
            output,
        } => {
            commands::run_gloss(input.clone(), text.clone(), output.clone(), settings).await?;
        }

        Commands::Process {
            input,
            topics,
            output,
        } => {
            commands::run_process(input, *topics, output.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
