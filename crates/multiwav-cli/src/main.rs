//! multiwav CLI - Command-line interface for per-channel audio takes
//!
//! This binary analyzes folders of audio files and reorganizes them: silent
//! files are removed, fake stereo is collapsed and per-channel files are
//! merged into multichannel files.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli_args::{Cli, Commands};
use multiwav_cli::commands;
use multiwav_cli::commands::file_ops::JoinArgs;
use multiwav_cli::commands::proceed::ProceedArgs;

/// Logs go to stderr so that `--json` output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            input_dir,
            config,
            json,
        } => commands::analyze::run(&input_dir, config.as_deref(), json),
        Commands::Proceed {
            input_dir,
            config,
            read_only,
            forced,
            no_remove,
            no_monoize,
            no_join,
            no_backup,
            backup_folder,
            delimiter,
            json,
        } => commands::proceed::run(&ProceedArgs {
            input_dir,
            config,
            read_only,
            forced,
            no_remove,
            no_monoize,
            no_join,
            no_backup,
            backup_folder,
            delimiter,
            json,
        }),
        Commands::Backup {
            input_dir,
            folder,
            read_only,
            json,
        } => commands::backup::run(&input_dir, folder.as_deref(), read_only, json),
        Commands::Split { input, delimiter } => commands::file_ops::split(&input, &delimiter),
        Commands::Monoize { input, channel } => commands::file_ops::monoize(&input, channel),
        Commands::Remove { input, forced } => commands::file_ops::remove(&input, forced),
        Commands::Join {
            input,
            others,
            newfile,
            keep,
            forced,
            read_only,
        } => commands::file_ops::join(&JoinArgs {
            input,
            others,
            newfile,
            keep,
            forced,
            read_only,
        }),
        Commands::JoinLegacy { input, delimiter } => {
            commands::file_ops::join_legacy(&input, &delimiter)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from(["multiwav", "analyze", "--input-dir", "takes", "--json"])
            .unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Analyze {
                input_dir,
                config,
                json,
            } => {
                assert_eq!(input_dir, "takes");
                assert!(config.is_none());
                assert!(json);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_cli_parses_proceed_flags() {
        let cli = Cli::try_parse_from([
            "multiwav",
            "proceed",
            "--input-dir",
            "takes",
            "--read-only",
            "--no-join",
            "--no-backup",
            "--backup-folder",
            "old",
            "--delimiter",
            "_",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Proceed {
                input_dir,
                read_only,
                forced,
                no_remove,
                no_join,
                no_backup,
                backup_folder,
                delimiter,
                ..
            } => {
                assert_eq!(input_dir, "takes");
                assert!(read_only);
                assert!(!forced);
                assert!(!no_remove);
                assert!(no_join);
                assert!(no_backup);
                assert_eq!(backup_folder.as_deref(), Some("old"));
                assert_eq!(delimiter.as_deref(), Some("_"));
            }
            _ => panic!("expected proceed command"),
        }
    }

    #[test]
    fn test_cli_parses_join_others() {
        let cli = Cli::try_parse_from([
            "multiwav", "join", "--input", "a.1.wav", "--others", "a.2.wav", "a.3.wav", "--keep",
        ])
        .unwrap();
        match cli.command {
            Commands::Join {
                input,
                others,
                newfile,
                keep,
                forced,
                read_only,
            } => {
                assert_eq!(input, "a.1.wav");
                assert_eq!(others, vec!["a.2.wav", "a.3.wav"]);
                assert!(newfile.is_none());
                assert!(keep);
                assert!(!forced);
                assert!(!read_only);
            }
            _ => panic!("expected join command"),
        }
    }

    #[test]
    fn test_cli_join_requires_others() {
        assert!(Cli::try_parse_from(["multiwav", "join", "--input", "a.wav"]).is_err());
    }

    #[test]
    fn test_cli_split_default_delimiter() {
        let cli = Cli::try_parse_from(["multiwav", "split", "-i", "take.wav"]).unwrap();
        match cli.command {
            Commands::Split { input, delimiter } => {
                assert_eq!(input, "take.wav");
                assert_eq!(delimiter, ".");
            }
            _ => panic!("expected split command"),
        }
    }

    #[test]
    fn test_cli_monoize_channel() {
        let cli =
            Cli::try_parse_from(["multiwav", "monoize", "-i", "s.wav", "--channel", "1"]).unwrap();
        match cli.command {
            Commands::Monoize { channel, .. } => assert_eq!(channel, Some(1)),
            _ => panic!("expected monoize command"),
        }
    }

    #[test]
    fn test_cli_join_legacy() {
        let cli = Cli::try_parse_from([
            "multiwav",
            "join-legacy",
            "--input",
            "take.L.wav",
            "--delimiter",
            "_",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::JoinLegacy { ref delimiter, .. } if delimiter == "_"
        ));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["multiwav"]).is_err());
    }
}
