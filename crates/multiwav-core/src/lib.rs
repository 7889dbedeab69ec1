//! Multiwav Core
//!
//! Analysis and reorganization of multichannel recordings stored as one
//! file per channel (`take.L.wav`, `take.R.wav`, `take.1.wav` ...).
//!
//! # Overview
//!
//! Every file in a folder is classified from its samples (silence, channel
//! correlation, fake stereo), then assigned an action:
//!
//! - **Remove** - silent files are deleted
//! - **Monoize** - stereo files with redundant channels collapse to mono
//! - **Join** - per-channel files sharing a base name merge into one file
//! - **Split** - a multichannel file is written out one file per channel
//!
//! All writes are staged in a temporary file next to the destination and
//! renamed into place, so a failed write never damages the original.
//!
//! # Example
//!
//! ```ignore
//! use multiwav_core::{FileList, Options};
//!
//! let mut list = FileList::scan("recordings/session1", &Options::default())?;
//! let report = list.proceed()?;
//! println!("{} files changed", report.summary.applied);
//! ```
//!
//! # Crate Structure
//!
//! - [`FileList`] - folder listing and the orchestration pass
//! - [`AudioFile`] - one file: identity, facts, mutations
//! - [`analysis`] - signal classification
//! - [`naming`] - channel suffix parsing
//! - [`join_groups`] - grouping of per-channel files
//! - [`resolver`] - default action resolution
//! - [`backup`] - backup path placement
//! - [`wav`] - WAV codec on top of `hound`

pub mod action;
pub mod analysis;
pub mod audio_file;
pub mod backup;
pub mod error;
pub mod folder;
pub mod join_groups;
pub mod naming;
pub mod options;
pub mod resolver;
pub mod wav;

pub use action::Action;
pub use analysis::{Classification, ValidChannel};
pub use audio_file::{
    parse_peer_list, Applied, AudioFile, JoinOptions, JoinOutcome, JoinRole, LoadState, Outcome,
    UnloadReason,
};
pub use backup::BackupManager;
pub use error::{Error, Result};
pub use folder::{FileList, FileReport, FolderReport, FolderSummary};
pub use join_groups::{JoinGroup, JoinGroups};
pub use options::{BackupOptions, Options};
