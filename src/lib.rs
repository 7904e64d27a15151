//! tidyup - sort a folder tree into category subfolders
//!
//! This library scans a directory tree, hashes every file to find
//! byte-identical duplicates, classifies the rest by extension, moves them
//! into category subfolders, and records each move in a log that can later
//! be replayed backwards to restore the original layout.

pub mod cli;
pub mod config;
pub mod conflict;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod hasher;
pub mod logging;
pub mod move_log;
pub mod output;
pub mod restore;

pub use error::{OrganizeError, Result};
pub use file_category::{Category, FileMapper, classify};
pub use file_organizer::{Organizer, OrganizeReport, organize};
pub use move_log::{MoveEntry, MoveLog};
pub use restore::{RestoreOutcome, RestoreSummary, restore};

pub use cli::{OrganizeCommand, run_cli};
