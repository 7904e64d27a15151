/// Persisted record of one organize run.
///
/// The log is a JSON document stored as a hidden file in the organized root:
///
/// ```json
/// {
///   "timestamp": "2026-10-19T13:24:00.000000Z",
///   "moves": [
///     { "from": "/data/a.txt", "to": "/data/Documents/a.txt" }
///   ]
/// }
/// ```
///
/// Paths are absolute. The file is written to a temp file in the same folder
/// and then renamed over the old log, so a crash never leaves it truncated.
use crate::error::{OrganizeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File name of the move log inside the organized root.
pub const LOG_FILE_NAME: &str = ".organize_log.json";

/// One completed relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    /// Where the file was before the run.
    pub from: PathBuf,
    /// Where the file was moved to.
    pub to: PathBuf,
}

impl MoveEntry {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered moves of one run, keyed by the time the run finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveLog {
    /// When the log was produced.
    pub timestamp: DateTime<Utc>,
    /// Moves in the order they were performed.
    pub moves: Vec<MoveEntry>,
}

impl MoveLog {
    /// Creates a log stamped with the current time.
    pub fn new(moves: Vec<MoveEntry>) -> Self {
        Self {
            timestamp: Utc::now(),
            moves,
        }
    }

    /// Returns the path to the log file for a root folder.
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(LOG_FILE_NAME)
    }

    /// Writes this log atomically into `root`, replacing any previous log.
    pub fn save(&self, root: &Path) -> Result<PathBuf> {
        let log_path = Self::path_for(root);
        let write_error = |source| OrganizeError::LogWrite {
            path: log_path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| write_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let mut temp_file = tempfile::NamedTempFile::new_in(root).map_err(write_error)?;
        temp_file.write_all(json.as_bytes()).map_err(write_error)?;
        temp_file.as_file().sync_all().map_err(write_error)?;
        temp_file
            .persist(&log_path)
            .map_err(|e| write_error(e.error))?;

        tracing::debug!(path = %log_path.display(), moves = self.moves.len(), "move log written");
        Ok(log_path)
    }

    /// Loads the log stored in `root`.
    ///
    /// Fails with [`OrganizeError::LogNotFound`] when there is no log and
    /// [`OrganizeError::LogCorrupt`] when it cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let log_path = Self::path_for(root);

        let json_string = match fs::read_to_string(&log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(OrganizeError::LogNotFound { path: log_path });
            }
            Err(e) => {
                return Err(OrganizeError::LogCorrupt {
                    path: log_path,
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_str(&json_string).map_err(|e| OrganizeError::LogCorrupt {
            path: log_path,
            reason: format!("JSON parse error: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let log = MoveLog::new(vec![
            MoveEntry::new(root.join("a.txt"), root.join("Documents/a.txt")),
            MoveEntry::new(root.join("c.jpg"), root.join("Images/c.jpg")),
        ]);

        let written = log.save(root).expect("Failed to save log");
        assert_eq!(written, root.join(LOG_FILE_NAME));

        let loaded = MoveLog::load(root).expect("Failed to load log");
        assert_eq!(loaded, log);
    }

    #[test]
    fn test_log_uses_from_and_to_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        MoveLog::new(vec![MoveEntry::new("/data/a.txt", "/data/Documents/a.txt")])
            .save(root)
            .expect("Failed to save log");

        let raw = fs::read_to_string(root.join(LOG_FILE_NAME)).expect("Failed to read log");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("Invalid JSON");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["moves"][0]["from"], "/data/a.txt");
        assert_eq!(value["moves"][0]["to"], "/data/Documents/a.txt");
    }

    #[test]
    fn test_save_replaces_previous_log_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        MoveLog::new(vec![MoveEntry::new("/a", "/b")])
            .save(root)
            .expect("Failed to save log");
        MoveLog::new(Vec::new()).save(root).expect("Failed to save log");

        assert!(MoveLog::load(root).unwrap().moves.is_empty());
        let entries: Vec<_> = fs::read_dir(root).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        assert!(matches!(
            MoveLog::load(temp_dir.path()),
            Err(OrganizeError::LogNotFound { .. })
        ));
    }

    #[test]
    fn test_truncated_log_is_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(
            temp_dir.path().join(LOG_FILE_NAME),
            r#"{"timestamp": "2026-10-19T10:00:00Z", "moves": [{"from": "/a""#,
        )
        .unwrap();

        assert!(matches!(
            MoveLog::load(temp_dir.path()),
            Err(OrganizeError::LogCorrupt { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join(LOG_FILE_NAME), r#"{"moves": "nope"}"#).unwrap();

        assert!(matches!(
            MoveLog::load(temp_dir.path()),
            Err(OrganizeError::LogCorrupt { .. })
        ));
    }
}
