//! In-place mutations: monoize, remove, split, backup.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{AudioFile, LoadState, UnloadReason};
use crate::error::{Error, Result};
use crate::naming::ChannelToken;
use crate::wav;

impl AudioFile {
    /// Collapses the file to one channel: `channel` (0-based) keeps that
    /// channel, `None` averages all of them. Returns `false` when there was
    /// nothing to do (already mono, or not loaded).
    ///
    /// The new content is staged next to the file and renamed over it, so a
    /// failed write leaves the original untouched.
    pub fn monoize(&mut self, channel: Option<usize>) -> Result<bool> {
        let LoadState::Loaded(buffer) = &self.state else {
            return Ok(false);
        };
        if buffer.channels() <= 1 {
            return Ok(false);
        }

        let mono = match channel {
            Some(c) if c >= buffer.channels() => {
                return Err(Error::InvalidChannel {
                    path: self.path.clone(),
                    channel: c,
                    channels: buffer.format.channels,
                });
            }
            Some(c) => buffer.extract(c),
            None => buffer.mixdown(),
        };

        let staged = wav::encode_staged(&self.path, &mono).map_err(|e| Error::write(&self.path, e))?;
        staged
            .persist(&self.path)
            .map_err(|e| Error::write(&self.path, e.error))?;

        tracing::info!(
            "monoized {} ({})",
            self.path.display(),
            match channel {
                Some(c) => format!("kept channel {}", c + 1),
                None => "mixdown".to_string(),
            }
        );
        self.set_state(LoadState::Loaded(mono));
        Ok(true)
    }

    /// Deletes the file. A silent file is always deleted; one carrying
    /// signal only with `forced`. Returns `false` when the file was already
    /// gone or is not loaded.
    pub fn remove(&mut self, forced: bool) -> Result<bool> {
        if !self.path.exists() {
            self.set_state(LoadState::Unloaded(UnloadReason::Removed));
            return Ok(false);
        }
        let Some(silent) = self.is_silent() else {
            return Ok(false);
        };
        if !silent && !forced {
            return Err(Error::RemoveRefused {
                path: self.path.clone(),
            });
        }

        fs::remove_file(&self.path)?;
        tracing::info!("removed {}", self.path.display());
        self.set_state(LoadState::Unloaded(UnloadReason::Removed));
        Ok(true)
    }

    /// Path of the file holding `token` when this file is split.
    pub fn split_path(&self, delimiter: &str, token: &ChannelToken) -> PathBuf {
        let mut name: OsString = self.root().into_os_string();
        name.push(delimiter);
        name.push(token.to_string());
        name.push(self.extension());
        PathBuf::from(name)
    }

    /// Writes one file per channel (`<root><delimiter><token><ext>`) and
    /// deletes the original. Returns the written paths, empty when the file
    /// has a single channel or is not loaded.
    ///
    /// Existing files are never overwritten.
    pub fn split(&mut self, delimiter: &str) -> Result<Vec<PathBuf>> {
        let LoadState::Loaded(buffer) = &self.state else {
            return Ok(vec![]);
        };
        let channels = buffer.channels();
        if channels < 2 {
            return Ok(vec![]);
        }

        let targets: Vec<PathBuf> = (0..channels)
            .map(|c| self.split_path(delimiter, &ChannelToken::for_split(c, channels)))
            .collect();
        if let Some(existing) = targets.iter().find(|t| t.exists()) {
            return Err(Error::write(existing, "destination already exists"));
        }

        let staged = targets
            .iter()
            .enumerate()
            .map(|(c, target)| {
                wav::encode_staged(target, &buffer.extract(c)).map_err(|e| Error::write(target, e))
            })
            .collect::<Result<Vec<_>>>()?;

        for (file, target) in staged.into_iter().zip(&targets) {
            file.persist_noclobber(target)
                .map_err(|e| Error::write(target, e.error))?;
        }
        fs::remove_file(&self.path)?;

        tracing::info!(
            "split {} into {} files",
            self.path.display(),
            targets.len()
        );
        self.set_state(LoadState::Unloaded(UnloadReason::Removed));
        Ok(targets)
    }

    /// Copies the file to `destination`, creating parent folders. With
    /// `read_only` only the destination is returned.
    pub fn backup(&self, destination: &Path, read_only: bool) -> Result<PathBuf> {
        if read_only {
            return Ok(destination.to_path_buf());
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.path, destination)?;
        tracing::debug!(
            "backed up {} to {}",
            self.path.display(),
            destination.display()
        );
        Ok(destination.to_path_buf())
    }
}
