//! Merging per-channel files into one multichannel file.

use std::fs;
use std::path::{Path, PathBuf};

use super::{AudioFile, LoadState, UnloadReason};
use crate::error::{Error, Result};
use crate::naming::{self, ChannelToken};
use crate::wav::{self, AudioBuffer};

/// Parameters of [`AudioFile::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOptions {
    /// Name or path of the merged file; defaults to the shared base name.
    pub newfile: Option<String>,
    /// Delete every participant after a successful write.
    pub remove: bool,
    /// Zero-pad shorter participants instead of refusing.
    pub forced: bool,
    /// Only compute the destination.
    pub read_only: bool,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            newfile: None,
            remove: true,
            forced: false,
            read_only: false,
        }
    }
}

/// Result of a successful join call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The merged file was written.
    Joined {
        /// The merged file.
        path: PathBuf,
        /// Participants deleted afterwards.
        removed: Vec<PathBuf>,
    },
    /// Read-only: the merged file would be written here.
    Preview {
        /// Destination.
        path: PathBuf,
    },
}

/// Splits a single string holding several paths, separated like `PATH`.
pub fn parse_peer_list(list: &str) -> Vec<PathBuf> {
    std::env::split_paths(list)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

impl AudioFile {
    /// Resolves the destination of a join.
    ///
    /// No name gives `<dir>/<filebase><ext>` and a bare name is placed next
    /// to this file, with the extension appended unless already present. A
    /// name with a directory is used as is.
    pub fn newfile_path(&self, name: Option<&str>) -> PathBuf {
        let extension = self.extension();
        let name = match name {
            Some(name) => name.to_string(),
            None => self.filebase(),
        };
        let candidate = Path::new(&name);
        if candidate
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty())
        {
            return candidate.to_path_buf();
        }
        let mut path = self.dirname().join(candidate).into_os_string();
        if !name.to_lowercase().ends_with(&extension.to_lowercase()) {
            path.push(&extension);
        }
        PathBuf::from(path)
    }

    /// Merges this file (first channels) with `others` into a new
    /// multichannel file.
    ///
    /// Every participant must exist and decode, otherwise
    /// [`Error::MissingJoinPeer`] names the offending path. Participants of
    /// different length are refused with [`Error::SizeMismatch`] unless
    /// `forced`, which zero-pads them to the longest one.
    pub fn join(&mut self, others: &[PathBuf], options: &JoinOptions) -> Result<JoinOutcome> {
        let mut ordered = vec![self.path.clone()];
        ordered.extend(others.iter().filter(|p| **p != self.path).cloned());
        let target = self.newfile_path(options.newfile.as_deref());
        self.merge(&ordered, &target, options)
    }

    /// Rebuilds the sibling set from the naming convention alone and joins
    /// it into the shared base name.
    ///
    /// Letter tokens probe `L` and `R`; numeric tokens probe `1, 2, ...`
    /// until a file is missing. Returns `None` when this file carries no
    /// token or fewer than two siblings exist.
    pub fn join_old(
        &mut self,
        delimiter: &str,
        options: &JoinOptions,
    ) -> Result<Option<JoinOutcome>> {
        let parsed = naming::parse(&self.filename(), delimiter);
        let Some(token) = parsed.channel else {
            return Ok(None);
        };

        let sibling = |token: ChannelToken| {
            self.dirname().join(format!(
                "{}{}{}{}",
                parsed.base,
                delimiter,
                token,
                self.extension()
            ))
        };

        let ordered: Vec<PathBuf> = match token {
            ChannelToken::Letter(c) => {
                let (left, right) = if c.is_lowercase() {
                    ('l', 'r')
                } else {
                    ('L', 'R')
                };
                [left, right]
                    .into_iter()
                    .map(|c| sibling(ChannelToken::Letter(c)))
                    .filter(|p| p.exists())
                    .collect()
            }
            ChannelToken::Index(_) => (1..)
                .map(|n| sibling(ChannelToken::Index(n)))
                .take_while(|p| p.exists())
                .collect(),
        };

        if ordered.len() < 2 || !ordered.contains(&self.path) {
            tracing::debug!(
                "no sibling set for {} ({} candidates)",
                self.path.display(),
                ordered.len()
            );
            return Ok(None);
        }

        let target = self.newfile_path(Some(&parsed.base));
        self.merge(&ordered, &target, options).map(Some)
    }

    fn merge(
        &mut self,
        ordered: &[PathBuf],
        target: &Path,
        options: &JoinOptions,
    ) -> Result<JoinOutcome> {
        let buffers = ordered
            .iter()
            .map(|path| self.participant(path))
            .collect::<Result<Vec<_>>>()?;

        let first = &buffers[0];
        for (path, buffer) in ordered.iter().zip(&buffers).skip(1) {
            if !buffer.format.is_compatible(&first.format) {
                return Err(Error::FormatMismatch {
                    path: path.clone(),
                    expected: first.format.to_string(),
                    found: buffer.format.to_string(),
                });
            }
            if buffer.frames() != first.frames() && !options.forced {
                return Err(Error::SizeMismatch {
                    path: path.clone(),
                    expected: first.frames(),
                    found: buffer.frames(),
                });
            }
        }

        if target.exists() && !ordered.iter().any(|p| p == target) {
            return Err(Error::write(target, "destination already exists"));
        }

        if options.read_only {
            return Ok(JoinOutcome::Preview {
                path: target.to_path_buf(),
            });
        }

        let channels: Vec<Vec<f64>> = buffers
            .iter()
            .flat_map(|b| (0..b.channels()).map(move |c| b.channel(c)))
            .collect();
        let merged = AudioBuffer::from_channels(&channels, first.format);

        let staged = wav::encode_staged(target, &merged).map_err(|e| Error::write(target, e))?;
        staged
            .persist(target)
            .map_err(|e| Error::write(target, e.error))?;
        tracing::info!(
            "joined {} files into {} ({} channels)",
            ordered.len(),
            target.display(),
            merged.channels()
        );

        let mut removed = Vec::new();
        if options.remove {
            for path in ordered.iter().filter(|p| p.as_path() != target) {
                fs::remove_file(path)?;
                removed.push(path.clone());
            }
        }

        if self.path == target {
            self.set_state(LoadState::Loaded(merged));
        } else if removed.contains(&self.path) {
            self.set_state(LoadState::Unloaded(UnloadReason::Removed));
        }

        Ok(JoinOutcome::Joined {
            path: target.to_path_buf(),
            removed,
        })
    }

    fn participant(&self, path: &Path) -> Result<AudioBuffer> {
        if path == self.path {
            if let Some(buffer) = self.buffer() {
                return Ok(buffer.clone());
            }
        }
        wav::decode(path).map_err(|e| {
            tracing::warn!("join participant {} unavailable: {}", path.display(), e);
            Error::MissingJoinPeer {
                path: path.to_path_buf(),
            }
        })
    }
}
