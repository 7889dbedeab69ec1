//! Backup command implementation

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use multiwav_core::{FileList, Options};

use super::json_output::{error_codes, print_json, JsonError};

/// Output of the backup command.
#[derive(Debug, Clone, Serialize)]
pub struct BackupOutput {
    pub success: bool,
    /// Nothing was copied
    pub read_only: bool,
    /// Backup copies, one per audio file
    pub copies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonError>,
}

/// Run the backup command.
///
/// # Arguments
/// * `input_dir` - Folder whose audio files are copied
/// * `folder` - Backup folder name or path (default: bak)
/// * `read_only` - Only compute the destinations
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    input_dir: &str,
    folder: Option<&str>,
    read_only: bool,
    json_output: bool,
) -> Result<ExitCode> {
    let mut options = Options::default();
    if let Some(folder) = folder {
        options.backup_options.folder = folder.to_string();
    }
    options.backup_options.read_only = read_only;

    let result = FileList::scan(Path::new(input_dir), &options)
        .map_err(|e| (error_codes::DIR_READ, e))
        .and_then(|mut list| list.backup().map_err(|e| (error_codes::BACKUP, e)));

    let copies = match result {
        Ok(copies) => copies,
        Err((code, e)) if json_output => {
            let output = BackupOutput {
                success: false,
                read_only,
                copies: vec![],
                errors: vec![JsonError::new(code, e.to_string())],
            };
            print_json(&output)?;
            return Ok(ExitCode::from(1));
        }
        Err((_, e)) => anyhow::bail!("Backup of {} failed: {}", input_dir, e),
    };

    let output = BackupOutput {
        success: true,
        read_only,
        copies: copies.iter().map(|p| p.display().to_string()).collect(),
        errors: vec![],
    };
    if json_output {
        print_json(&output)?;
    } else {
        let verb = if read_only { "Would copy" } else { "Copied" };
        for copy in &output.copies {
            println!("{} {}", "->".dimmed(), copy);
        }
        println!(
            "\n{} {} files",
            verb.green().bold(),
            output.copies.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_backup_copies_audio_files_only() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.wav"), b"data").unwrap();
        fs::write(tmp.path().join("readme.txt"), b"text").unwrap();

        let code = run(tmp.path().to_str().unwrap(), Some("keep"), false, true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(fs::read(tmp.path().join("keep").join("a.wav")).unwrap(), b"data");
        assert!(!tmp.path().join("keep").join("readme.txt").exists());
    }

    #[test]
    fn test_backup_read_only() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.wav"), b"data").unwrap();

        run(tmp.path().to_str().unwrap(), None, true, false).unwrap();
        assert!(!tmp.path().join("bak").exists());
    }
}
