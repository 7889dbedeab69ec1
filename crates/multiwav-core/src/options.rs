//! Configuration for one orchestration pass.
//!
//! `Options` is built once (defaults, optionally overlaid by a JSON file and
//! then by command-line flags) and passed by reference everywhere. Nothing
//! mutates it during a pass.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Default zero-lag correlation above which two channels count as redundant.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.999;

/// Default amplitude floor in dBFS.
pub const DEFAULT_THRESHOLD_DB: f64 = -100.0;

/// Where and how backups are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupOptions {
    /// Backup folder name (relative to the source folder) or explicit path.
    pub folder: String,
    /// Probe `bak`, `bak1`, `bak2`, ... until an unused folder is found.
    pub unique: bool,
    /// Compute backup paths without copying anything.
    pub read_only: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            folder: "bak".to_string(),
            unique: true,
            read_only: false,
        }
    }
}

/// Options consumed by the resolver and the mutation operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Delete silent files.
    pub remove: bool,
    /// Collapse fake-stereo files to mono.
    pub monoize: bool,
    /// Merge per-channel files into one multichannel file.
    pub join: bool,
    /// Channel delimiter in filenames.
    pub delimiter: String,
    /// A file whose peak is at or below this level (dBFS) is silent.
    pub null_threshold: f64,
    /// A channel whose peak is at or below this level (dBFS) carries no signal.
    pub empty_threshold: f64,
    /// Correlation above which stereo channels are considered equivalent.
    pub correlation_threshold: f64,
    /// Back up every file before mutating the folder.
    pub backup: bool,
    /// Backup placement.
    pub backup_options: BackupOptions,
    /// Preview mode: report actions without touching the filesystem.
    pub read_only: bool,
    /// Override the join size check and the remove silence check.
    pub forced: bool,
    /// Channel (0-based) kept by monoize instead of averaging.
    pub channel: Option<usize>,
    /// Audio file extensions to scan for, without the dot.
    pub extensions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove: true,
            monoize: true,
            join: true,
            delimiter: ".".to_string(),
            null_threshold: DEFAULT_THRESHOLD_DB,
            empty_threshold: DEFAULT_THRESHOLD_DB,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            backup: true,
            backup_options: BackupOptions::default(),
            read_only: false,
            forced: false,
            channel: None,
            extensions: vec!["wav".to_string(), "wave".to_string()],
        }
    }
}

impl Options {
    /// Loads options from a JSON file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses options from a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(Error::Config("delimiter must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.correlation_threshold) {
            return Err(Error::Config(format!(
                "correlation_threshold must be within [0, 1], got {}",
                self.correlation_threshold
            )));
        }
        if self.null_threshold > 0.0 || self.empty_threshold > 0.0 {
            return Err(Error::Config(
                "thresholds are dBFS values and must not be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// True when `extension` (with or without a leading dot) is scanned.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.remove);
        assert!(options.monoize);
        assert!(options.join);
        assert!(options.backup);
        assert!(!options.read_only);
        assert!(!options.forced);
        assert_eq!(options.delimiter, ".");
        assert_eq!(options.null_threshold, -100.0);
        assert_eq!(options.empty_threshold, -100.0);
        assert_eq!(options.backup_options.folder, "bak");
        assert!(options.backup_options.unique);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = Options::from_json(r#"{ "remove": false, "delimiter": "_" }"#).unwrap();
        assert!(!options.remove);
        assert_eq!(options.delimiter, "_");
        assert!(options.monoize);
        assert_eq!(options.backup_options, BackupOptions::default());
    }

    #[test]
    fn test_nested_backup_options() {
        let options =
            Options::from_json(r#"{ "backup_options": { "folder": "old", "read_only": true } }"#)
                .unwrap();
        assert_eq!(options.backup_options.folder, "old");
        assert!(options.backup_options.unique);
        assert!(options.backup_options.read_only);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Options::from_json(r#"{ "delimiter": "" }"#).is_err());
        assert!(Options::from_json(r#"{ "correlation_threshold": 1.5 }"#).is_err());
        assert!(Options::from_json(r#"{ "null_threshold": 3.0 }"#).is_err());
        assert!(Options::from_json("not json").is_err());
    }

    #[test]
    fn test_extension_matching() {
        let options = Options::default();
        assert!(options.accepts_extension("wav"));
        assert!(options.accepts_extension(".WAV"));
        assert!(options.accepts_extension("Wave"));
        assert!(!options.accepts_extension("flac"));
    }
}
