//! multiwav CLI library.
//!
//! Command implementations behind the `multiwav` binary: folder analysis,
//! the orchestration pass, backups and single-file operations.

pub mod commands;
