//! CLI argument definitions for the multiwav command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// multiwav - analyze and reorganize per-channel audio takes
#[derive(Parser)]
#[command(name = "multiwav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Log debug details to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify every audio file in a folder and show the proposed actions
    Analyze {
        /// Folder to scan
        #[arg(long)]
        input_dir: String,

        /// Options file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Back up, then remove, monoize and join the files of a folder
    Proceed {
        /// Folder to process
        #[arg(long)]
        input_dir: String,

        /// Options file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Report what would happen without touching any file
        #[arg(long)]
        read_only: bool,

        /// Join mismatched lengths (zero-padded) and remove non-silent files
        #[arg(long)]
        forced: bool,

        /// Keep silent files
        #[arg(long)]
        no_remove: bool,

        /// Keep fake-stereo files as they are
        #[arg(long)]
        no_monoize: bool,

        /// Do not merge per-channel files
        #[arg(long)]
        no_join: bool,

        /// Skip the backup copy
        #[arg(long)]
        no_backup: bool,

        /// Backup folder name or path (default: bak)
        #[arg(long)]
        backup_folder: Option<String>,

        /// Channel delimiter in filenames (default: ".")
        #[arg(long)]
        delimiter: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Copy every audio file of a folder into a new backup folder
    Backup {
        /// Folder to back up
        #[arg(long)]
        input_dir: String,

        /// Backup folder name or path (default: bak)
        #[arg(long)]
        folder: Option<String>,

        /// Only print where the copies would go
        #[arg(long)]
        read_only: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Write one file per channel and delete the original
    Split {
        /// File to split
        #[arg(short, long)]
        input: String,

        /// Channel delimiter (default: ".")
        #[arg(long, default_value = ".")]
        delimiter: String,
    },

    /// Collapse a file to a single channel
    Monoize {
        /// File to collapse
        #[arg(short, long)]
        input: String,

        /// Keep this channel (0-based) instead of averaging all channels
        #[arg(long)]
        channel: Option<usize>,
    },

    /// Delete a silent file
    Remove {
        /// File to delete
        #[arg(short, long)]
        input: String,

        /// Delete even if the file carries signal
        #[arg(long)]
        forced: bool,
    },

    /// Merge files into one multichannel file (input first)
    Join {
        /// First file of the merge
        #[arg(short, long)]
        input: String,

        /// Files merged after the input, in order
        #[arg(long, num_args = 1.., required = true)]
        others: Vec<String>,

        /// Name or path of the merged file (default: shared base name)
        #[arg(long)]
        newfile: Option<String>,

        /// Keep the source files
        #[arg(long)]
        keep: bool,

        /// Zero-pad files of different length
        #[arg(long)]
        forced: bool,

        /// Only print the destination
        #[arg(long)]
        read_only: bool,
    },

    /// Merge a file with its siblings found by name (L/R or 1..N)
    JoinLegacy {
        /// Any channel file of the take
        #[arg(short, long)]
        input: String,

        /// Channel delimiter (default: ".")
        #[arg(long, default_value = ".")]
        delimiter: String,
    },
}
