//! Error types for file analysis and mutation.

use std::path::PathBuf;
use thiserror::Error;

use crate::wav::CodecError;

/// Result type for multiwav operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analyzing or mutating audio files.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is missing or the codec could not decode it.
    #[error("failed to load '{path}': {source}")]
    Load {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },

    /// A named join participant does not exist or cannot be loaded.
    #[error("join participant not found: {path}")]
    MissingJoinPeer {
        /// The offending participant.
        path: PathBuf,
    },

    /// Join participants have unequal frame counts.
    #[error("size mismatch: '{path}' has {found} frames, expected {expected}")]
    SizeMismatch {
        /// Participant whose length differs.
        path: PathBuf,
        /// Frame count of the first participant.
        expected: usize,
        /// Frame count of the offending participant.
        found: usize,
    },

    /// Join participants disagree on sample rate, bit depth or sample format.
    #[error("format mismatch: '{path}' is {found}, expected {expected}")]
    FormatMismatch {
        /// Participant whose format differs.
        path: PathBuf,
        /// Format of the first participant.
        expected: String,
        /// Format of the offending participant.
        found: String,
    },

    /// A channel index outside the file's channel range was requested.
    #[error("channel {channel} out of range for '{path}' ({channels} channels)")]
    InvalidChannel {
        /// The file.
        path: PathBuf,
        /// Requested zero-based channel.
        channel: usize,
        /// Channel count of the file.
        channels: u16,
    },

    /// Refused to delete a file that carries signal without `forced`.
    #[error("refusing to remove non-silent file '{path}' without force")]
    RemoveRefused {
        /// The file.
        path: PathBuf,
    },

    /// Encoding or staging a new file failed. The original is left intact.
    #[error("failed to write '{path}': {message}")]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a write error for `path`.
    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns true for the "not found" family, distinct from other failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MissingJoinPeer { .. })
    }
}
