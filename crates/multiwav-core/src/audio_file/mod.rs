//! One audio file: identity, classification, action and mutations.
//!
//! An `AudioFile` is either loaded (decoded samples available) or unloaded
//! with a reason. Classification is computed from the samples on first
//! access and cached until the samples change; an unloaded file reports
//! every fact as unknown (`None`).

mod join;
mod ops;


pub use join::{parse_peer_list, JoinOptions, JoinOutcome};

use serde::Serialize;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use crate::action::Action;
use crate::analysis::{classify, Classification, Thresholds, ValidChannel};
use crate::error::{Error, Result};
use crate::naming::{self, ChannelToken, ParsedName};
use crate::options::Options;
use crate::resolver;
use crate::wav::{self, AudioBuffer, WavFormat};

/// Why a file has no samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadReason {
    /// Opened as an identity only.
    NotAnalyzed,
    /// Samples released by [`AudioFile::close`].
    Closed,
    /// The file was deleted or consumed by this process.
    Removed,
    /// Missing file or decode failure.
    Failed(String),
}

/// Sample data of a file.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Decoded samples.
    Loaded(AudioBuffer),
    /// No samples available.
    Unloaded(UnloadReason),
}

/// Role of a file inside a join group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinRole {
    /// First member: merges the group into `newfile`.
    Leader {
        /// The other members, in channel order.
        peers: Vec<PathBuf>,
        /// Base name of the merged file.
        newfile: String,
    },
    /// Consumed by the leader's join.
    Follower {
        /// The group leader.
        leader: PathBuf,
    },
}

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Read-only mode: nothing was touched.
    Preview {
        /// Resulting file, when the action produces one.
        path: Option<PathBuf>,
    },
    /// The operation had nothing to do.
    Unchanged,
    /// Channels collapsed in place.
    Monoized,
    /// File deleted.
    Removed,
    /// One file written per channel.
    Split(Vec<PathBuf>),
    /// Merged file written.
    Joined {
        /// The merged file.
        path: PathBuf,
        /// Source files deleted afterwards.
        removed: Vec<PathBuf>,
    },
    /// Merged into another file by its group leader's join.
    Consumed {
        /// The merged file.
        into: PathBuf,
    },
}

impl Outcome {
    /// True when the filesystem was changed.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Outcome::Preview { .. } | Outcome::Unchanged)
    }
}

/// Result of [`AudioFile::proceed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The action that ran (or would run in read-only mode).
    pub action: Action,
    /// What it did.
    pub outcome: Outcome,
}

/// An audio file and everything known about it.
#[derive(Debug)]
pub struct AudioFile {
    path: PathBuf,
    delimiter: String,
    thresholds: Thresholds,
    state: LoadState,
    facts: OnceCell<Classification>,
    group_size: Option<usize>,
    action: Action,
    join_role: Option<JoinRole>,
}

impl AudioFile {
    /// Opens and decodes `path`. A load failure is not an error: the file
    /// becomes an inert identity whose facts are all unknown.
    pub fn open(path: impl Into<PathBuf>, options: &Options) -> Self {
        let mut file = Self::unloaded(path, options);
        file.reload();
        file
    }

    /// Opens `path`, failing with [`Error::Load`] when it cannot be decoded.
    pub fn try_open(path: impl Into<PathBuf>, options: &Options) -> Result<Self> {
        let path = path.into();
        match wav::decode(&path) {
            Ok(buffer) => {
                let mut file = Self::unloaded(path, options);
                file.set_state(LoadState::Loaded(buffer));
                Ok(file)
            }
            Err(source) => Err(Error::Load { path, source }),
        }
    }

    /// Builds the identity of `path` without reading it.
    pub fn unloaded(path: impl Into<PathBuf>, options: &Options) -> Self {
        Self {
            path: path.into(),
            delimiter: options.delimiter.clone(),
            thresholds: Thresholds::from(options),
            state: LoadState::Unloaded(UnloadReason::NotAnalyzed),
            facts: OnceCell::new(),
            group_size: None,
            action: Action::Default,
            join_role: None,
        }
    }

    /// Decodes the file again, discarding cached facts.
    pub fn reload(&mut self) -> bool {
        match wav::decode(&self.path) {
            Ok(buffer) => {
                tracing::debug!(
                    "loaded {} ({} ch, {} frames, {})",
                    self.path.display(),
                    buffer.channels(),
                    buffer.frames(),
                    buffer.format
                );
                self.set_state(LoadState::Loaded(buffer));
                true
            }
            Err(e) => {
                tracing::debug!("cannot load {}: {}", self.path.display(), e);
                self.set_state(LoadState::Unloaded(UnloadReason::Failed(e.to_string())));
                false
            }
        }
    }

    /// Releases the samples. The identity stays usable.
    pub fn close(&mut self) {
        self.set_state(LoadState::Unloaded(UnloadReason::Closed));
    }

    /// Marks the file as deleted by another file's operation.
    pub(crate) fn mark_removed(&mut self) {
        self.set_state(LoadState::Unloaded(UnloadReason::Removed));
    }

    fn set_state(&mut self, state: LoadState) {
        self.state = state;
        self.facts = OnceCell::new();
    }

    // ---------------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------------

    /// Full path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Containing directory.
    pub fn dirname(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name with extension.
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without extension.
    pub fn filename(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Path without the extension.
    pub fn root(&self) -> PathBuf {
        self.path.with_extension("")
    }

    /// Delimiter used to parse this file's channel token.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Naming-convention parse of [`filename`](Self::filename).
    pub fn parsed_name(&self) -> ParsedName {
        naming::parse(&self.filename(), &self.delimiter)
    }

    /// Filename without its channel suffix.
    pub fn filebase(&self) -> String {
        self.parsed_name().base
    }

    /// Channel token, if the filename carries one.
    pub fn channel_token(&self) -> Option<ChannelToken> {
        self.parsed_name().channel
    }

    // ---------------------------------------------------------------------
    // Samples and classification
    // ---------------------------------------------------------------------

    /// Current sample state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Decoded samples, if loaded.
    pub fn buffer(&self) -> Option<&AudioBuffer> {
        match &self.state {
            LoadState::Loaded(buffer) => Some(buffer),
            LoadState::Unloaded(_) => None,
        }
    }

    /// True when samples are available.
    pub fn is_loaded(&self) -> bool {
        self.buffer().is_some()
    }

    /// Format of the decoded samples.
    pub fn format(&self) -> Option<WavFormat> {
        self.buffer().map(|b| b.format)
    }

    /// Classification facts, computed on first access.
    pub fn classification(&self) -> Option<&Classification> {
        let buffer = self.buffer()?;
        Some(self.facts.get_or_init(|| classify(buffer, &self.thresholds)))
    }

    pub fn channels(&self) -> Option<u16> {
        self.classification().map(|c| c.channels)
    }

    /// Frames per channel.
    pub fn frames(&self) -> Option<usize> {
        self.classification().map(|c| c.frames)
    }

    /// Every sample at or below the null threshold.
    pub fn is_silent(&self) -> Option<bool> {
        self.classification().map(|c| c.is_empty)
    }

    pub fn correlation(&self) -> Option<f64> {
        self.classification().and_then(|c| c.correlation)
    }

    /// Stereo channels correlated above threshold. Unknown for non-stereo.
    pub fn is_correlated(&self) -> Option<bool> {
        self.classification().and_then(|c| c.is_correlated)
    }

    pub fn valid_channel(&self) -> Option<ValidChannel> {
        self.classification().map(|c| c.valid_channel)
    }

    pub fn is_mono(&self) -> Option<bool> {
        self.classification().map(Classification::is_mono)
    }

    pub fn is_fake_stereo(&self) -> Option<bool> {
        self.classification().map(|c| c.is_fake_stereo)
    }

    /// More than two channels in the file, or part of a join group with more
    /// than two members.
    pub fn is_multichannel(&self) -> Option<bool> {
        let channels = self.channels()?;
        Some(channels > 2 || self.group_size.is_some_and(|n| n > 2))
    }

    /// Records the size of the join group this file belongs to.
    pub fn set_group_size(&mut self, size: Option<usize>) {
        self.group_size = size;
    }

    // ---------------------------------------------------------------------
    // Action
    // ---------------------------------------------------------------------

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    /// Sets the action from a one-letter code; unknown codes reset it to
    /// [`Action::Default`].
    pub fn set_action_code(&mut self, code: char) {
        self.action = Action::from_code(code);
    }

    pub fn join_role(&self) -> Option<&JoinRole> {
        self.join_role.as_ref()
    }

    pub fn set_join_role(&mut self, role: Option<JoinRole>) {
        self.join_role = role;
    }

    /// Files this one should be merged with (empty unless it leads a group).
    pub fn join_peers(&self) -> &[PathBuf] {
        match &self.join_role {
            Some(JoinRole::Leader { peers, .. }) => peers,
            _ => &[],
        }
    }

    /// Resolves [`Action::Default`] and runs the resulting operation.
    ///
    /// In read-only mode nothing is touched: the action that would run is
    /// reported, with the resulting path for a join.
    pub fn proceed(&mut self, options: &Options) -> Result<Applied> {
        let action = match self.action {
            Action::Default => resolver::resolve(self, options),
            explicit => explicit,
        };

        if options.read_only && action != Action::Join {
            tracing::debug!("preview {}: {}", self.path.display(), action);
            return Ok(Applied {
                action,
                outcome: Outcome::Preview { path: None },
            });
        }

        let outcome = match action {
            Action::Default | Action::None => Outcome::Unchanged,
            Action::Monoize => match self.monoize(options.channel)? {
                true => Outcome::Monoized,
                false => Outcome::Unchanged,
            },
            Action::Remove => match self.remove(options.forced)? {
                true => Outcome::Removed,
                false => Outcome::Unchanged,
            },
            Action::Split => {
                let written = self.split(&options.delimiter)?;
                if written.is_empty() {
                    Outcome::Unchanged
                } else {
                    Outcome::Split(written)
                }
            }
            Action::Join => {
                let join_options = JoinOptions {
                    newfile: None,
                    remove: true,
                    forced: options.forced,
                    read_only: options.read_only,
                };
                let joined = match self.join_role.clone() {
                    Some(JoinRole::Leader { peers, newfile }) => {
                        let join_options = JoinOptions {
                            newfile: Some(newfile),
                            ..join_options
                        };
                        Some(self.join(&peers, &join_options)?)
                    }
                    Some(JoinRole::Follower { .. }) => None,
                    None => self.join_old(&options.delimiter, &join_options)?,
                };
                match joined {
                    Some(JoinOutcome::Joined { path, removed }) => Outcome::Joined { path, removed },
                    Some(JoinOutcome::Preview { path }) => Outcome::Preview { path: Some(path) },
                    None => Outcome::Unchanged,
                }
            }
        };

        Ok(Applied { action, outcome })
    }
}

impl PartialEq for AudioFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for AudioFile {}
