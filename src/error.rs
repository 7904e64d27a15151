//! Error types shared by the organizer and the restorer.
//!
//! Precondition failures (bad root, missing or unreadable log) abort an
//! operation before anything on disk changes. Everything else is a per-file
//! error: it is recorded in the run report and the batch carries on.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for organize and restore operations.
pub type Result<T> = std::result::Result<T, OrganizeError>;

/// Errors that can occur while organizing or restoring a folder.
#[derive(Error, Debug)]
pub enum OrganizeError {
    /// The root path is missing, unreadable, or not a directory.
    #[error("Invalid folder {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// A file could not be read while hashing, or a directory could not be listed.
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be moved to its destination.
    #[error("Could not move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A category folder could not be created.
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A confirmed duplicate could not be deleted.
    #[error("Could not delete duplicate {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No move log exists in the folder.
    #[error("No move log found at {}", path.display())]
    LogNotFound { path: PathBuf },

    /// The move log exists but cannot be read or parsed.
    #[error("Move log {} is corrupted: {reason}", path.display())]
    LogCorrupt { path: PathBuf, reason: String },

    /// The move log could not be written.
    #[error("Could not write move log {}: {source}", path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single log entry could not be moved back.
    #[error("Could not restore {} to {}: {source}", from.display(), to.display())]
    RestoreEntry {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OrganizeError {
    /// The path this error is about.
    ///
    /// For moves this is the file being moved, not the destination.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidPath { path, .. }
            | Self::Read { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Delete { path, .. }
            | Self::LogNotFound { path }
            | Self::LogCorrupt { path, .. }
            | Self::LogWrite { path, .. } => path,
            Self::Move { from, .. } | Self::RestoreEntry { from, .. } => from,
        }
    }

    /// Whether this error aborts the whole operation rather than one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. } | Self::LogNotFound { .. } | Self::LogCorrupt { .. }
        )
    }

    /// Whether the underlying cause was a permission denial.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Read { source, .. }
            | Self::Move { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Delete { source, .. }
            | Self::LogWrite { source, .. }
            | Self::RestoreEntry { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            Self::InvalidPath { reason, .. } => reason.contains("permission denied"),
            Self::LogNotFound { .. } | Self::LogCorrupt { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reports_offending_path() {
        let err = OrganizeError::Move {
            from: PathBuf::from("/data/a.txt"),
            to: PathBuf::from("/data/Documents/a.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), Path::new("/data/a.txt"));
        assert!(err.is_permission_denied());
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/data/Documents/a.txt"));
    }

    #[test]
    fn test_precondition_errors_are_fatal() {
        let missing = OrganizeError::LogNotFound {
            path: PathBuf::from("/data/.organize_log.json"),
        };
        let corrupt = OrganizeError::LogCorrupt {
            path: PathBuf::from("/data/.organize_log.json"),
            reason: "EOF while parsing".to_string(),
        };
        let invalid = OrganizeError::InvalidPath {
            path: PathBuf::from("/nope"),
            reason: "does not exist".to_string(),
        };
        assert!(missing.is_fatal());
        assert!(corrupt.is_fatal());
        assert!(invalid.is_fatal());
        assert!(!invalid.is_permission_denied());
    }
}
