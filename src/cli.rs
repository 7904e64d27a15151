//! Command-line interface module for tidyup.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Dispatch to the organizer or the restorer
//! - Rendering the resulting report
//! - Mapping failures to process exit codes

use crate::config::{Mode, RunConfig};
use crate::error::{OrganizeError, Result};
use crate::file_organizer::Organizer;
use crate::output::OutputFormatter;
use crate::restore::restore;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Sort a folder into category subfolders, delete byte-identical duplicates,
/// and undo the whole thing from a move log.
#[derive(Parser, Debug, Clone)]
#[command(name = "tidyup", version, about, long_about = None)]
pub struct Args {
    /// Folder to organize (default: current directory)
    pub folder: Option<PathBuf>,

    /// Preview changes without moving or deleting anything
    #[arg(long, conflicts_with = "restore")]
    pub dry_run: bool,

    /// Move files back to where they were, using the folder's move log
    #[arg(long)]
    pub restore: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summaries and errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Exit code for fatal errors.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code when a fatal error was a permission denial (EACCES).
pub const EXIT_PERMISSION_DENIED: u8 = 13;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
    },
    /// Restore the previous organization.
    Restore,
}

impl From<Mode> for OrganizeCommand {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Organize { dry_run } => OrganizeCommand::Organize { dry_run },
            Mode::Restore => OrganizeCommand::Restore,
        }
    }
}

/// Runs one command against `dir_path` and prints its report.
///
/// Per-file problems are printed as part of the report and do not make this
/// fail; only precondition errors do.
///
/// # Examples
///
/// ```no_run
/// use tidyup::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::Organize { dry_run: true }, Path::new("/path/to/directory"));
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<()> {
    run_cli_quiet(command, dir_path, false)
}

/// Same as [`run_cli`], optionally hiding per-file listings and progress.
pub fn run_cli_quiet(command: OrganizeCommand, dir_path: &Path, quiet: bool) -> Result<()> {
    match command {
        OrganizeCommand::Organize { dry_run } => {
            if dry_run {
                OutputFormatter::dry_run_notice(&format!("Analyzing {}", dir_path.display()));
            } else {
                OutputFormatter::info(&format!("Organizing {}", dir_path.display()));
            }
            let report = Organizer::new(dir_path)
                .dry_run(dry_run)
                .progress(OutputFormatter::create_progress_bar(0, quiet))
                .run()?;
            OutputFormatter::organize_report(dir_path, &report, quiet);
        }
        OrganizeCommand::Restore => {
            OutputFormatter::info(&format!("Restoring {}", dir_path.display()));
            let summary = restore(dir_path)?;
            OutputFormatter::restore_summary(dir_path, &summary, quiet);
        }
    }
    Ok(())
}

/// Binary entry point: parse, configure logging, run, and pick an exit code.
pub fn main_with_args(args: Args) -> ExitCode {
    crate::logging::init_logger(args.verbose);

    let outcome = RunConfig::from_args(&args)
        .and_then(|config| run_cli_quiet(config.mode.into(), &config.root, config.quiet));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Maps a fatal error to the process exit code.
pub fn exit_code_for(error: &OrganizeError) -> u8 {
    if error.is_permission_denied() {
        EXIT_PERMISSION_DENIED
    } else {
        EXIT_FAILURE
    }
}
