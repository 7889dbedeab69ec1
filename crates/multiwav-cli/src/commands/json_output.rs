//! JSON output types for machine-readable CLI output.
//!
//! Structured output for the `--json` flag on `analyze`, `proceed` and
//! `backup`. Errors carry stable codes so scripts can react to them.

use serde::Serialize;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// Input folder missing or unreadable
    pub const DIR_READ: &str = "CLI_001";
    /// Options file could not be loaded
    pub const CONFIG: &str = "CLI_002";
    /// Audio file could not be decoded
    pub const LOAD: &str = "CLI_003";
    /// A file operation failed during the pass
    pub const FILE_OPERATION: &str = "CLI_004";
    /// Backup could not be written
    pub const BACKUP: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File the error is about (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
