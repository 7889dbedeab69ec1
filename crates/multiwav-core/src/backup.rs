//! Backup placement.
//!
//! Paths are probed with an increasing numeric suffix (`bak`, `bak1`,
//! `bak2`, ...) until one is free. Nothing is created here, so a read-only
//! preview never touches the disk. Paths handed out are remembered, which
//! keeps consecutive requests distinct even before anything is written.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Hands out backup folder and file paths that are never already in use.
#[derive(Debug, Default)]
pub struct BackupManager {
    claimed: HashSet<PathBuf>,
}

impl BackupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the backup folder.
    ///
    /// `name` is either a folder name placed under `base_folder` or a path
    /// with its own parent directory. With `unique`, the first unused of
    /// `name`, `name1`, `name2`, ... is returned; otherwise `name` itself,
    /// which may already exist.
    pub fn backup_folder(&mut self, base_folder: &Path, name: &str, unique: bool) -> PathBuf {
        let requested = Path::new(name.trim_end_matches(['/', '\\']));
        let parent = match requested.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => base_folder.to_path_buf(),
        };
        let folder = requested
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("bak"));

        if !unique {
            return parent.join(folder);
        }

        let path = self.first_free(|n| {
            let mut candidate = folder.clone();
            if n > 0 {
                candidate.push(n.to_string());
            }
            parent.join(candidate)
        });
        tracing::debug!("backup folder: {}", path.display());
        path
    }

    /// Chooses a file path inside `folder` for a copy of `file_name`,
    /// appending a number before the extension when the name is taken.
    pub fn backup_file(&mut self, folder: &Path, file_name: &str) -> PathBuf {
        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        let extension = name.extension().map(|e| {
            let mut ext = OsString::from(".");
            ext.push(e);
            ext
        });

        self.first_free(|n| {
            let mut candidate = stem.clone();
            if n > 0 {
                candidate.push(n.to_string());
            }
            if let Some(ext) = &extension {
                candidate.push(ext);
            }
            folder.join(candidate)
        })
    }

    fn first_free(&mut self, candidate: impl Fn(usize) -> PathBuf) -> PathBuf {
        let path = (0..)
            .map(candidate)
            .find(|p| !p.exists() && !self.claimed.contains(p))
            .unwrap_or_default();
        self.claimed.insert(path.clone());
        path
    }
}
