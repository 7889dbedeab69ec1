//! CLI command implementations

pub mod analyze;
pub mod backup;
pub mod file_ops;
pub mod json_output;
pub mod proceed;

use anyhow::{Context, Result};
use multiwav_core::Options;
use std::path::Path;

/// Loads options from `config` (JSON) or returns the defaults.
pub fn load_options(config: Option<&str>) -> Result<Options> {
    match config {
        Some(path) => Options::from_file(Path::new(path))
            .with_context(|| format!("Failed to load options file: {}", path)),
        None => Ok(Options::default()),
    }
}
