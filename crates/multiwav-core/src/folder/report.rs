//! Serializable results of a folder pass.

use serde::Serialize;
use std::path::PathBuf;

use crate::action::Action;
use crate::audio_file::Outcome;
use crate::join_groups::JoinGroup;

/// Result for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// The file.
    pub path: PathBuf,
    /// Action that ran (or would run in read-only mode).
    pub action: Action,
    /// Whether the filesystem was changed for this file.
    pub applied: bool,
    /// What happened, when the action completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Error message, when the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub(crate) fn completed(path: PathBuf, action: Action, outcome: Outcome) -> Self {
        Self {
            path,
            action,
            applied: outcome.is_applied(),
            outcome: Some(outcome),
            error: None,
        }
    }

    pub(crate) fn failed(path: PathBuf, action: Action, error: String) -> Self {
        Self {
            path,
            action,
            applied: false,
            outcome: None,
            error: Some(error),
        }
    }
}

/// Counts over all file reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    /// Files processed.
    pub total: usize,
    /// Files changed on disk.
    pub applied: usize,
    /// Files left as they were (or previewed).
    pub unchanged: usize,
    /// Files whose action failed.
    pub errors: usize,
}

/// Result of [`FileList::proceed`](super::FileList::proceed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderReport {
    /// The processed folder.
    pub folder: PathBuf,
    /// Nothing was written.
    pub read_only: bool,
    /// Backup copies made (or planned in read-only mode).
    pub backups: Vec<PathBuf>,
    /// Join groups detected before any mutation.
    pub join_groups: Vec<JoinGroup>,
    /// One entry per file, in listing order.
    pub files: Vec<FileReport>,
    /// Counts.
    pub summary: FolderSummary,
    /// True when no file reported an error.
    pub success: bool,
}

impl FolderReport {
    pub(crate) fn new(
        folder: PathBuf,
        read_only: bool,
        backups: Vec<PathBuf>,
        join_groups: Vec<JoinGroup>,
        files: Vec<FileReport>,
    ) -> Self {
        let summary = FolderSummary {
            total: files.len(),
            applied: files.iter().filter(|f| f.applied).count(),
            unchanged: files
                .iter()
                .filter(|f| !f.applied && f.error.is_none())
                .count(),
            errors: files.iter().filter(|f| f.error.is_some()).count(),
        };
        Self {
            folder,
            read_only,
            backups,
            join_groups,
            files,
            success: summary.errors == 0,
            summary,
        }
    }

    /// Report entry for `path`.
    pub fn file(&self, path: &std::path::Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }
}
