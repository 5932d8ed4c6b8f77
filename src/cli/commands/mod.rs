//! Command implementations.

mod clean;
mod config;
mod fetch;
mod gloss;
mod process;
mod segment;
mod serve;

pub use clean::run_clean;
pub use config::run_config;
pub use fetch::run_fetch;
pub use gloss::run_gloss;
pub use process::run_process;
pub use segment::run_segment;
pub use serve::run_serve;

use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::io::Read;

/// Read an artifact from a file path, or stdin when the path is '-'.
pub(crate) fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(Settings::expand_path(path))?)
    }
}

/// Write an artifact to a file, or stdout when no path is given.
pub(crate) fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(Settings::expand_path(path), content)?;
            Output::success(&format!("Wrote {}", path));
        }
        None => println!("{}", content),
    }
    Ok(())
}
