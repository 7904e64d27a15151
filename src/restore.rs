/// Reverting an organize run from its move log.
///
/// Every logged move is replayed backwards, last move first. A restore never
/// overwrites: if something already sits at the original path, the file comes
/// back under a numbered name instead. The log is left in place.
use crate::conflict;
use crate::error::{OrganizeError, Result};
use crate::file_organizer::validate_root;
use crate::move_log::{MoveEntry, MoveLog};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to one log entry.
#[derive(Debug)]
pub enum RestoreOutcome {
    /// The file was moved back to this path.
    Restored(PathBuf),
    /// Nothing exists at the entry's `to` path any more.
    SkippedMissingSource,
    /// The move back failed; the file stays where it was.
    Failed(OrganizeError),
}

/// Per-entry outcomes plus aggregate counts.
#[derive(Debug, Default)]
pub struct RestoreSummary {
    /// Entries in the order they were processed (reverse log order).
    pub outcomes: Vec<(MoveEntry, RestoreOutcome)>,
    /// Number of files moved back.
    pub restored: usize,
    /// Number of entries whose file was gone.
    pub skipped: usize,
    /// Number of entries that could not be restored.
    pub failed: usize,
}

impl RestoreSummary {
    fn record(&mut self, entry: MoveEntry, outcome: RestoreOutcome) {
        match &outcome {
            RestoreOutcome::Restored(_) => self.restored += 1,
            RestoreOutcome::SkippedMissingSource => self.skipped += 1,
            RestoreOutcome::Failed(_) => self.failed += 1,
        }
        self.outcomes.push((entry, outcome));
    }

    /// Returns the total number of entries processed.
    pub fn total_processed(&self) -> usize {
        self.restored + self.skipped + self.failed
    }

    /// Returns true if no entry failed.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Errors of the failed entries.
    pub fn errors(&self) -> impl Iterator<Item = &OrganizeError> {
        self.outcomes.iter().filter_map(|(_, outcome)| match outcome {
            RestoreOutcome::Failed(e) => Some(e),
            _ => None,
        })
    }
}

/// Restores every file recorded in the move log under `root`.
///
/// Fails before touching anything when the root is invalid, the log is
/// missing, or the log cannot be parsed. Per-entry problems are counted in
/// the summary and never stop the loop.
///
/// # Examples
///
/// ```no_run
/// use tidyup::restore::restore;
/// use std::path::Path;
///
/// match restore(Path::new("/path/to/directory")) {
///     Ok(summary) => println!("Restored {} files", summary.restored),
///     Err(e) => eprintln!("Restore failed: {}", e),
/// }
/// ```
pub fn restore(root: &Path) -> Result<RestoreSummary> {
    validate_root(root)?;
    let log = MoveLog::load(root)?;
    info!(
        root = %root.display(),
        entries = log.moves.len(),
        timestamp = %log.timestamp,
        "restoring"
    );

    let mut summary = RestoreSummary::default();
    for entry in log.moves.into_iter().rev() {
        let outcome = restore_entry(&entry);
        match &outcome {
            RestoreOutcome::Restored(path) => {
                debug!(from = %entry.to.display(), to = %path.display(), "restored")
            }
            RestoreOutcome::SkippedMissingSource => {
                warn!(path = %entry.to.display(), "file missing, skipped")
            }
            RestoreOutcome::Failed(e) => warn!(error = %e, "restore failed"),
        }
        summary.record(entry, outcome);
    }

    info!(
        restored = summary.restored,
        skipped = summary.skipped,
        failed = summary.failed,
        "restore finished"
    );
    Ok(summary)
}

/// Moves one file from `entry.to` back to `entry.from`.
fn restore_entry(entry: &MoveEntry) -> RestoreOutcome {
    if fs::symlink_metadata(&entry.to).is_err() {
        return RestoreOutcome::SkippedMissingSource;
    }

    let failed = |target: &Path, source| {
        RestoreOutcome::Failed(OrganizeError::RestoreEntry {
            from: entry.to.clone(),
            to: target.to_path_buf(),
            source,
        })
    };

    if let Some(parent) = entry.from.parent()
        && !parent.is_dir()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return failed(&entry.from, e);
    }

    let target = conflict::resolve(&entry.from);
    match fs::rename(&entry.to, &target) {
        Ok(()) => RestoreOutcome::Restored(target),
        Err(e) => failed(&target, e),
    }
}
