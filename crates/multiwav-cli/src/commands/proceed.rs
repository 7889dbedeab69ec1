//! Proceed command implementation
//!
//! Runs the full orchestration pass over a folder: backup, then remove,
//! monoize and join as resolved per file. Per-file failures are reported
//! and the pass continues.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use multiwav_core::{FileList, FolderReport, Options, Outcome};

use super::json_output::{error_codes, print_json, JsonError};
use super::load_options;

/// Command-line overrides for one pass.
#[derive(Debug, Clone, Default)]
pub struct ProceedArgs {
    pub input_dir: String,
    pub config: Option<String>,
    pub read_only: bool,
    pub forced: bool,
    pub no_remove: bool,
    pub no_monoize: bool,
    pub no_join: bool,
    pub no_backup: bool,
    pub backup_folder: Option<String>,
    pub delimiter: Option<String>,
    pub json: bool,
}

impl ProceedArgs {
    /// Applies the flags on top of `options`. Flags only ever switch
    /// behavior away from the loaded value, never back.
    pub fn apply(&self, mut options: Options) -> Options {
        options.read_only |= self.read_only;
        options.forced |= self.forced;
        options.remove &= !self.no_remove;
        options.monoize &= !self.no_monoize;
        options.join &= !self.no_join;
        options.backup &= !self.no_backup;
        if let Some(folder) = &self.backup_folder {
            options.backup_options.folder = folder.clone();
        }
        if let Some(delimiter) = &self.delimiter {
            options.delimiter = delimiter.clone();
        }
        options
    }
}

/// JSON output of the proceed command: the folder report plus CLI errors.
#[derive(Debug, serde::Serialize)]
struct ProceedOutput<'a> {
    #[serde(flatten)]
    report: &'a FolderReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<JsonError>,
}

/// Run the proceed command.
///
/// # Returns
/// Exit code: 0 if every file was processed, 1 if any failed
pub fn run(args: &ProceedArgs) -> Result<ExitCode> {
    let options = match load_options(args.config.as_deref())
        .map(|options| args.apply(options))
        .and_then(|options| {
            options.validate()?;
            Ok(options)
        }) {
        Ok(options) => options,
        Err(e) if args.json => {
            let error = JsonError::new(error_codes::CONFIG, format!("{:#}", e));
            print_json(&serde_json::json!({ "success": false, "errors": [error] }))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e),
    };

    let mut list = match FileList::scan(Path::new(&args.input_dir), &options) {
        Ok(list) => list,
        Err(e) if args.json => {
            let error = JsonError::new(error_codes::DIR_READ, e.to_string());
            print_json(&serde_json::json!({ "success": false, "errors": [error] }))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => anyhow::bail!("Cannot scan {}: {}", args.input_dir, e),
    };

    let report = match list.proceed() {
        Ok(report) => report,
        Err(e) if args.json => {
            let error = JsonError::new(error_codes::BACKUP, e.to_string());
            print_json(&serde_json::json!({ "success": false, "errors": [error] }))?;
            return Ok(ExitCode::from(1));
        }
        Err(e) => anyhow::bail!("Pass aborted before any change: {}", e),
    };

    if args.json {
        let errors = report
            .files
            .iter()
            .filter_map(|f| {
                f.error.as_ref().map(|e| {
                    JsonError::new(error_codes::FILE_OPERATION, e.clone())
                        .with_file(f.path.display().to_string())
                })
            })
            .collect();
        print_json(&ProceedOutput {
            report: &report,
            errors,
        })?;
    } else {
        print_results(&report);
    }

    if report.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn describe(outcome: &Outcome) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    match outcome {
        Outcome::Preview { path: Some(path) } => format!("would write {}", name(path.as_path())),
        Outcome::Preview { path: None } => "preview".to_string(),
        Outcome::Unchanged => "unchanged".to_string(),
        Outcome::Monoized => "monoized".to_string(),
        Outcome::Removed => "removed".to_string(),
        Outcome::Split(paths) => {
            let names: Vec<String> = paths.iter().map(|p| name(p.as_path())).collect();
            format!("split into {}", names.join(", "))
        }
        Outcome::Joined { path, .. } => format!("joined into {}", name(path.as_path())),
        Outcome::Consumed { into } => format!("merged into {}", name(into.as_path())),
    }
}

/// Print human-readable results.
fn print_results(report: &FolderReport) {
    println!("{}", "Folder Pass".cyan().bold());
    println!("{}", "===========".dimmed());
    if report.read_only {
        println!("{} Read-only, nothing was changed", "NOTE:".yellow());
    }
    println!("{} {}", "Folder:".dimmed(), report.folder.display());
    if let Some(first) = report.backups.first() {
        let folder = first.parent().unwrap_or(first.as_path());
        println!(
            "{} {} files to {}",
            "Backup:".dimmed(),
            report.backups.len(),
            folder.display()
        );
    }
    println!();

    for file in &report.files {
        let path = file.path.display();
        match (&file.error, &file.outcome) {
            (Some(error), _) => {
                println!("{} {} ({}) - {}", "ERROR".red(), path, file.action, error)
            }
            (None, Some(outcome)) if file.applied => {
                println!("{} {} - {}", "DONE".green(), path, describe(outcome))
            }
            (None, Some(outcome)) => {
                println!(
                    "{} {} ({}) - {}",
                    "SKIP".dimmed(),
                    path,
                    file.action,
                    describe(outcome)
                )
            }
            (None, None) => println!("{} {}", "SKIP".dimmed(), path),
        }
    }

    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "-------".dimmed());
    println!("Total:     {}", report.summary.total);
    println!("Changed:   {}", format!("{}", report.summary.applied).green());
    println!("Unchanged: {}", report.summary.unchanged);
    if report.summary.errors > 0 {
        println!("Errors:    {}", format!("{}", report.summary.errors).red());
        println!("\n{}", "Some files failed.".red().bold());
    } else {
        println!("Errors:    0");
    }
}
