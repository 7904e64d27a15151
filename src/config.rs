//! Resolved run configuration.
//!
//! Everything a run needs comes from the command line; no configuration file
//! is read. [`RunConfig::from_args`] turns parsed flags into an absolute root
//! and a single [`Mode`].

use crate::cli::Args;
use crate::error::{OrganizeError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// What a run does with the root folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Organize files in the folder.
    Organize {
        /// If true, report decisions without making changes.
        dry_run: bool,
    },
    /// Undo the previous organization from its move log.
    Restore,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Absolute, canonical root folder.
    pub root: PathBuf,
    pub mode: Mode,
    /// Debug-level logging.
    pub verbose: bool,
    /// Hide the progress bar and per-file listings.
    pub quiet: bool,
}

impl RunConfig {
    /// Builds the configuration from parsed arguments.
    ///
    /// The folder defaults to the current directory and is canonicalized, so
    /// every path in the move log is absolute.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidPath` if the folder does not exist or
    /// the current directory cannot be determined.
    pub fn from_args(args: &Args) -> Result<Self> {
        let folder = match &args.folder {
            Some(folder) => folder.clone(),
            None => env::current_dir().map_err(|e| OrganizeError::InvalidPath {
                path: PathBuf::from("."),
                reason: e.to_string(),
            })?,
        };

        let mode = if args.restore {
            Mode::Restore
        } else {
            Mode::Organize {
                dry_run: args.dry_run,
            }
        };

        Ok(Self {
            root: resolve_root(&folder)?,
            mode,
            verbose: args.verbose,
            quiet: args.quiet,
        })
    }
}

/// Canonicalizes `folder`, mapping failures to `InvalidPath`.
pub fn resolve_root(folder: &Path) -> Result<PathBuf> {
    folder.canonicalize().map_err(|e| OrganizeError::InvalidPath {
        path: folder.to_path_buf(),
        reason: match e.kind() {
            std::io::ErrorKind::NotFound => "does not exist".to_string(),
            std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
            _ => e.to_string(),
        },
    })
}
