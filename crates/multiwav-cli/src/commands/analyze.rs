//! Analyze command implementation
//!
//! Scans a folder, classifies every audio file and prints the action each
//! one would receive from `proceed`, plus the detected join groups. Nothing
//! on disk is modified.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use multiwav_core::{
    Action, AudioFile, FileList, JoinGroup, JoinRole, LoadState, UnloadReason, ValidChannel,
};

use super::json_output::{error_codes, print_json, JsonError};
use super::load_options;

/// Classification of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    /// Path to the audio file
    pub path: String,
    /// Whether the samples could be decoded
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,
    /// Peak level in dBFS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Left/right correlation (stereo files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fake_stereo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multichannel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_channel: Option<ValidChannel>,
    /// "leader" or "follower" when the file belongs to a join group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_role: Option<&'static str>,
    /// Action `proceed` would apply
    pub action: Action,
    /// Load error (if decoding failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAnalysis {
    fn new(file: &AudioFile, action: Action) -> Self {
        let classification = file.classification();
        let error = match file.state() {
            LoadState::Unloaded(UnloadReason::Failed(reason)) => Some(reason.clone()),
            _ => None,
        };
        Self {
            path: file.path().display().to_string(),
            loaded: file.is_loaded(),
            channels: file.channels(),
            frames: file.frames(),
            peak_db: classification.map(|c| c.peak_db).filter(|db| db.is_finite()),
            silent: file.is_silent(),
            correlation: file.correlation(),
            fake_stereo: file.is_fake_stereo(),
            multichannel: file.is_multichannel(),
            valid_channel: file.valid_channel(),
            join_role: file.join_role().map(|role| match role {
                JoinRole::Leader { .. } => "leader",
                JoinRole::Follower { .. } => "follower",
            }),
            action,
            error,
        }
    }
}

/// Output of the analyze command.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeOutput {
    /// Whether every file could be decoded
    pub success: bool,
    /// The scanned folder
    pub folder: String,
    pub files: Vec<FileAnalysis>,
    pub join_groups: Vec<JoinGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Run the analyze command.
///
/// # Arguments
/// * `input_dir` - Folder to scan
/// * `config` - Optional options file (JSON)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every file was decoded, 1 otherwise
pub fn run(input_dir: &str, config: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let failed = |error: JsonError| -> Result<ExitCode> {
        let output = AnalyzeOutput {
            success: false,
            folder: input_dir.to_string(),
            files: vec![],
            join_groups: vec![],
            errors: vec![error],
        };
        print_json(&output)?;
        Ok(ExitCode::from(1))
    };

    let options = match load_options(config) {
        Ok(options) => options,
        Err(e) if json_output => {
            return failed(JsonError::new(error_codes::CONFIG, format!("{:#}", e)))
        }
        Err(e) => return Err(e),
    };

    let list = match FileList::scan(Path::new(input_dir), &options) {
        Ok(list) => list,
        Err(e) if json_output => {
            return failed(JsonError::new(error_codes::DIR_READ, e.to_string()))
        }
        Err(e) => anyhow::bail!("Cannot scan {}: {}", input_dir, e),
    };

    let output = analyze(&list);
    if json_output {
        print_json(&output)?;
    } else {
        print_results(&output);
    }

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Builds the analysis of an already scanned folder.
pub fn analyze(list: &FileList) -> AnalyzeOutput {
    let files: Vec<FileAnalysis> = list
        .iter()
        .map(|file| FileAnalysis::new(file, list.planned_action(file)))
        .collect();
    let errors: Vec<JsonError> = files
        .iter()
        .filter_map(|f| {
            f.error
                .as_ref()
                .map(|e| JsonError::new(error_codes::LOAD, e.clone()).with_file(f.path.clone()))
        })
        .collect();

    AnalyzeOutput {
        success: errors.is_empty(),
        folder: list.folder().display().to_string(),
        files,
        join_groups: list.join_groups().iter().cloned().collect(),
        errors,
    }
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "?".to_string(),
    }
}

/// Print human-readable results.
fn print_results(output: &AnalyzeOutput) {
    println!("{}", "Folder Analysis".cyan().bold());
    println!("{}", "===============".dimmed());
    println!("{} {}\n", "Folder:".dimmed(), output.folder);

    for file in &output.files {
        if let Some(error) = &file.error {
            println!("{} {} - {}", "ERROR".red(), file.path, error);
            continue;
        }

        let action = match file.action {
            Action::None => file.action.to_string().dimmed(),
            Action::Remove => file.action.to_string().red(),
            _ => file.action.to_string().green(),
        };
        println!("{:<8} {}", action, file.path);
        println!(
            "         {} ch={} silent={} fake_stereo={} multichannel={}{}",
            "-".dimmed(),
            file.channels.map(|c| c.to_string()).unwrap_or_default(),
            yes_no(file.silent),
            yes_no(file.fake_stereo),
            yes_no(file.multichannel),
            file.correlation
                .map(|c| format!(" correlation={:.4}", c))
                .unwrap_or_default()
        );
    }

    if !output.join_groups.is_empty() {
        println!("\n{}", "Join Groups".cyan().bold());
        println!("{}", "-----------".dimmed());
        for group in &output.join_groups {
            let members: Vec<String> = group
                .members
                .iter()
                .map(|m| {
                    m.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                })
                .collect();
            println!("{} <- {}", group.base.bold(), members.join(", "));
        }
    }

    let actionable = output
        .files
        .iter()
        .filter(|f| f.action.is_mutation())
        .count();
    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "-------".dimmed());
    println!("Total:      {}", output.files.len());
    println!("Actionable: {}", actionable);
    if output.errors.is_empty() {
        println!("Errors:     0");
    } else {
        println!("Errors:     {}", format!("{}", output.errors.len()).red());
    }
}
