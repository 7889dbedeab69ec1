//! Single-file commands: split, monoize, remove, join, join-legacy.
//!
//! These open one file, refuse to continue when it cannot be decoded, and
//! print what was done.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use multiwav_core::{parse_peer_list, AudioFile, JoinOptions, JoinOutcome, Options};

fn open(input: &str) -> Result<AudioFile> {
    AudioFile::try_open(input, &Options::default())
        .with_context(|| format!("Cannot open {}", input))
}

fn done(message: impl std::fmt::Display) -> ExitCode {
    println!("{} {}", "DONE".green(), message);
    ExitCode::SUCCESS
}

fn skipped(message: impl std::fmt::Display) -> ExitCode {
    println!("{} {}", "SKIP".dimmed(), message);
    ExitCode::SUCCESS
}

/// Run the split command.
pub fn split(input: &str, delimiter: &str) -> Result<ExitCode> {
    let mut file = open(input)?;
    let written = file
        .split(delimiter)
        .with_context(|| format!("Failed to split {}", input))?;
    if written.is_empty() {
        return Ok(skipped(format!("{} has a single channel", input)));
    }
    for path in &written {
        println!("{} {}", "->".dimmed(), path.display());
    }
    Ok(done(format!("{} split into {} files", input, written.len())))
}

/// Run the monoize command.
pub fn monoize(input: &str, channel: Option<usize>) -> Result<ExitCode> {
    let mut file = open(input)?;
    let changed = file
        .monoize(channel)
        .with_context(|| format!("Failed to monoize {}", input))?;
    if changed {
        Ok(done(format!("{} is now mono", input)))
    } else {
        Ok(skipped(format!("{} is already mono", input)))
    }
}

/// Run the remove command.
pub fn remove(input: &str, forced: bool) -> Result<ExitCode> {
    let mut file = AudioFile::open(input, &Options::default());
    let removed = file
        .remove(forced)
        .with_context(|| format!("Failed to remove {}", input))?;
    if removed {
        Ok(done(format!("{} removed", input)))
    } else {
        Ok(skipped(format!("{} does not exist or cannot be read", input)))
    }
}

/// Arguments of the join command.
#[derive(Debug, Clone, Default)]
pub struct JoinArgs {
    pub input: String,
    /// Paths, each of which may itself be a path list
    pub others: Vec<String>,
    pub newfile: Option<String>,
    pub keep: bool,
    pub forced: bool,
    pub read_only: bool,
}

impl JoinArgs {
    /// Peer paths in order. Each value may hold several paths separated
    /// like `PATH`.
    pub fn peers(&self) -> Vec<PathBuf> {
        self.others.iter().flat_map(|o| parse_peer_list(o)).collect()
    }

    fn options(&self) -> JoinOptions {
        JoinOptions {
            newfile: self.newfile.clone(),
            remove: !self.keep,
            forced: self.forced,
            read_only: self.read_only,
        }
    }
}

fn report_join(outcome: JoinOutcome) -> ExitCode {
    match outcome {
        JoinOutcome::Joined { path, removed } => {
            for source in &removed {
                println!("{} {}", "removed".dimmed(), source.display());
            }
            done(format!("joined into {}", path.display()))
        }
        JoinOutcome::Preview { path } => {
            println!("{} Read-only, nothing was changed", "NOTE:".yellow());
            skipped(format!("would write {}", path.display()))
        }
    }
}

/// Run the join command.
pub fn join(args: &JoinArgs) -> Result<ExitCode> {
    let mut file = open(&args.input)?;
    let outcome = file
        .join(&args.peers(), &args.options())
        .with_context(|| format!("Failed to join {}", args.input))?;
    Ok(report_join(outcome))
}

/// Run the join-legacy command.
pub fn join_legacy(input: &str, delimiter: &str) -> Result<ExitCode> {
    let mut file = open(input)?;
    let outcome = file
        .join_old(delimiter, &JoinOptions::default())
        .with_context(|| format!("Failed to join {}", input))?;
    match outcome {
        Some(outcome) => Ok(report_join(outcome)),
        None => Ok(skipped(format!(
            "no sibling channel files found for {}",
            input
        ))),
    }
}
