/// The scan, hash, classify, deduplicate, move and log pipeline.
///
/// A run snapshots every regular file under the root before touching
/// anything, then handles the files one at a time in walk order:
///
/// 1. hash the file;
/// 2. if the digest was seen earlier in this run, the file is a duplicate and
///    is deleted (or only reported in dry-run mode);
/// 3. otherwise classify it and move it to `root/<Category>/<name>`, picking
///    a numbered name when that is taken.
///
/// Walk order is depth-first with each directory's entries sorted by file
/// name, so "first occurrence wins" picks the same survivor on every
/// platform. Symlinks are never followed and non-regular files are skipped.
/// Files named like the move log are never moved, at any depth, so a nested
/// folder that was organized on its own keeps its restore history.
use crate::conflict;
use crate::error::{OrganizeError, Result};
use crate::file_category::{Category, FileMapper};
use crate::hasher::{self, ContentDigest};
use crate::move_log::{LOG_FILE_NAME, MoveEntry, MoveLog};
use indexmap::IndexMap;
use indexmap::map::Entry;
use indicatif::ProgressBar;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A scanned file, owned by the organizer for one decision.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Absolute source path.
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Lowercased extension without the dot, empty when the name has none.
    pub extension: String,
    /// Category resolved from the extension.
    pub category: Category,
    digest: Option<ContentDigest>,
}

impl FileRecord {
    /// Builds a record for a file found by the walk.
    pub fn new(path: PathBuf, size: u64, mapper: &FileMapper) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(crate::file_category::normalize_extension)
            .unwrap_or_default();
        let category = mapper.categorize_path(&path);
        Self {
            path,
            size,
            extension,
            category,
            digest: None,
        }
    }

    /// The content digest, computed on first call and cached.
    pub fn digest(&mut self) -> Result<ContentDigest> {
        if let Some(digest) = self.digest {
            return Ok(digest);
        }
        let digest = hasher::digest(&self.path)?;
        self.digest = Some(digest);
        Ok(digest)
    }

    /// File name component of the source path.
    pub fn file_name(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }
}

/// Digest to the first record seen with it, in walk order.
#[derive(Debug, Default)]
pub(crate) struct ContentIndex {
    kept: IndexMap<ContentDigest, PathBuf>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` under `digest`.
    ///
    /// Returns `None` if the digest is new and `path` is now its kept file,
    /// or `Some(kept)` with the earlier file when `path` is a duplicate.
    pub fn insert(&mut self, digest: ContentDigest, path: &Path) -> Option<&Path> {
        match self.kept.entry(digest) {
            Entry::Occupied(entry) => Some(entry.into_mut().as_path()),
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                None
            }
        }
    }

    /// Number of distinct contents seen so far.
    pub fn len(&self) -> usize {
        self.kept.len()
    }
}

/// A file dropped because an earlier file had the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    /// The duplicate that was (or would be) deleted.
    pub path: PathBuf,
    /// The first file seen with the same content.
    pub original: PathBuf,
    /// Size of the duplicate at scan time.
    pub bytes: u64,
}

/// Outcome of one organize run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Performed moves, or planned moves in dry-run mode.
    pub moves: Vec<MoveEntry>,
    /// Duplicates removed, or that would be removed in dry-run mode.
    pub duplicates: Vec<Duplicate>,
    /// Per-file errors; each file listed here was left in place.
    pub errors: Vec<OrganizeError>,
    /// Files already sitting in their own category folder.
    pub already_organized: Vec<PathBuf>,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Where the move log was written, if it was.
    pub log_path: Option<PathBuf>,
}

impl OrganizeReport {
    /// True when no file hit an error.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Bytes reclaimed by deleting duplicates (or that would be, in dry-run mode).
    pub fn freed_bytes(&self) -> u64 {
        self.duplicates.iter().map(|d| d.bytes).sum()
    }

    /// Number of moves per destination category folder.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.moves {
            let category = entry
                .to
                .parent()
                .and_then(|dir| dir.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            *counts.entry(category).or_insert(0) += 1;
        }
        counts
    }
}

/// Runs the pipeline over one root folder.
///
/// # Examples
///
/// ```no_run
/// use tidyup::file_organizer::Organizer;
/// use std::path::Path;
///
/// let report = Organizer::new(Path::new("/home/user/Downloads"))
///     .dry_run(true)
///     .run()
///     .expect("folder should exist");
/// for entry in &report.moves {
///     println!("{} -> {}", entry.from.display(), entry.to.display());
/// }
/// ```
pub struct Organizer {
    root: PathBuf,
    dry_run: bool,
    mapper: FileMapper,
    progress: ProgressBar,
}

impl Organizer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run: false,
            mapper: FileMapper::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Compute and report every decision without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Progress bar ticked once per scanned file.
    pub fn progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Runs the whole pipeline.
    ///
    /// Only an invalid root aborts the run; every per-file failure lands in
    /// [`OrganizeReport::errors`].
    pub fn run(self) -> Result<OrganizeReport> {
        validate_root(&self.root)?;

        let mut report = OrganizeReport {
            dry_run: self.dry_run,
            ..OrganizeReport::default()
        };

        let mut records = self.scan(&mut report.errors);
        info!(
            root = %self.root.display(),
            files = records.len(),
            dry_run = self.dry_run,
            "scan complete"
        );

        self.progress.set_length(records.len() as u64);
        let mut index = ContentIndex::new();
        let mut planned: HashSet<PathBuf> = HashSet::new();

        for record in &mut records {
            self.progress.set_message(
                record
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            if let Err(e) = self.process(record, &mut index, &mut planned, &mut report) {
                warn!(path = %e.path().display(), error = %e, "file skipped");
                report.errors.push(e);
            }
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        if !self.dry_run && !report.moves.is_empty() {
            match MoveLog::new(report.moves.clone()).save(&self.root) {
                Ok(path) => report.log_path = Some(path),
                Err(e) => {
                    warn!(error = %e, "move log not written");
                    report.errors.push(e);
                }
            }
        }

        info!(
            moved = report.moves.len(),
            unique = index.len(),
            duplicates = report.duplicates.len(),
            freed_bytes = report.freed_bytes(),
            errors = report.errors.len(),
            "organize finished"
        );
        Ok(report)
    }

    /// Snapshots every regular file under the root, in walk order.
    fn scan(&self, errors: &mut Vec<OrganizeError>) -> Vec<FileRecord> {
        let mut records = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                    warn!(path = %path.display(), error = %source, "walk error");
                    errors.push(OrganizeError::Read { path, source });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                if !entry.file_type().is_dir() {
                    debug!(path = %entry.path().display(), "skipping non-regular file");
                }
                continue;
            }
            if entry.file_name() == LOG_FILE_NAME {
                debug!(path = %entry.path().display(), "skipping move log");
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            records.push(FileRecord::new(entry.into_path(), size, &self.mapper));
        }

        records
    }

    /// Decides and applies the fate of one file.
    fn process(
        &self,
        record: &mut FileRecord,
        index: &mut ContentIndex,
        planned: &mut HashSet<PathBuf>,
        report: &mut OrganizeReport,
    ) -> Result<()> {
        let digest = record.digest()?;

        if let Some(original) = index.insert(digest, &record.path) {
            let duplicate = Duplicate {
                path: record.path.clone(),
                original: original.to_path_buf(),
                bytes: record.size,
            };
            if !self.dry_run {
                fs::remove_file(&record.path).map_err(|source| OrganizeError::Delete {
                    path: record.path.clone(),
                    source,
                })?;
            }
            debug!(
                path = %duplicate.path.display(),
                original = %duplicate.original.display(),
                "duplicate"
            );
            report.duplicates.push(duplicate);
            return Ok(());
        }

        let category_dir = self.root.join(record.category.dir_name());
        if record.path.parent() == Some(category_dir.as_path()) {
            debug!(path = %record.path.display(), "already organized");
            report.already_organized.push(record.path.clone());
            return Ok(());
        }

        let Some(file_name) = record.file_name() else {
            return Ok(());
        };
        let wanted = category_dir.join(file_name);

        let destination = if self.dry_run {
            // A file where the category folder goes blocks the move unless an
            // earlier file in this run takes it out of the way.
            let vacated = report.moves.iter().any(|m| m.from == category_dir)
                || report.duplicates.iter().any(|d| d.path == category_dir);
            if category_dir.exists() && !category_dir.is_dir() && !vacated {
                return Err(OrganizeError::CreateDir {
                    path: category_dir,
                    source: io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
                });
            }
            let destination =
                conflict::resolve_with(&wanted, |p| p.exists() || planned.contains(p));
            planned.insert(destination.clone());
            destination
        } else {
            move_into(&record.path, &category_dir, &wanted)?
        };

        debug!(
            from = %record.path.display(),
            to = %destination.display(),
            category = %record.category,
            "move"
        );
        report
            .moves
            .push(MoveEntry::new(record.path.clone(), destination));
        Ok(())
    }
}

/// Organizes `root`, deleting duplicates and writing the move log.
///
/// With `dry_run` set, nothing on disk changes and no log is written.
pub fn organize(root: &Path, dry_run: bool) -> Result<OrganizeReport> {
    Organizer::new(root).dry_run(dry_run).run()
}

/// Checks that `root` exists, is a directory and can be listed.
pub fn validate_root(root: &Path) -> Result<()> {
    let invalid = |reason: &str| OrganizeError::InvalidPath {
        path: root.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => invalid("does not exist"),
        io::ErrorKind::PermissionDenied => invalid("permission denied"),
        _ => invalid(&e.to_string()),
    })?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory"));
    }
    fs::read_dir(root).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => invalid("permission denied"),
        _ => invalid(&e.to_string()),
    })?;
    Ok(())
}

/// Moves `file_path` into `category_dir`, creating the folder if needed and
/// never overwriting an existing file.
///
/// Returns the path the file ended up at.
pub fn move_into(file_path: &Path, category_dir: &Path, wanted: &Path) -> Result<PathBuf> {
    if !category_dir.is_dir() {
        fs::create_dir_all(category_dir).map_err(|source| OrganizeError::CreateDir {
            path: category_dir.to_path_buf(),
            source,
        })?;
    }

    let destination = conflict::resolve(wanted);
    fs::rename(file_path, &destination).map_err(|source| OrganizeError::Move {
        from: file_path.to_path_buf(),
        to: destination.clone(),
        source,
    })?;

    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_move_into_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let category_dir = base_path.join("Documents");
        let moved = move_into(&file_path, &category_dir, &category_dir.join("test.txt"))
            .expect("Failed to move file");

        assert!(category_dir.is_dir());
        assert!(!file_path.exists());
        assert_eq!(moved, category_dir.join("test.txt"));
        assert!(moved.exists());
    }

    #[test]
    fn test_move_into_never_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let category_dir = base_path.join("Images");
        fs::create_dir(&category_dir).expect("Failed to create category directory");
        fs::write(category_dir.join("test.png"), "old").expect("Failed to write file");

        let file_path = base_path.join("test.png");
        fs::write(&file_path, "new").expect("Failed to write test file");

        let moved = move_into(&file_path, &category_dir, &category_dir.join("test.png"))
            .expect("Failed to move file");

        assert_eq!(moved, category_dir.join("test(1).png"));
        assert_eq!(fs::read_to_string(category_dir.join("test.png")).unwrap(), "old");
        assert_eq!(fs::read_to_string(&moved).unwrap(), "new");
    }

    #[test]
    fn test_file_record_extension_and_category() {
        let mapper = FileMapper::default();
        let record = FileRecord::new(PathBuf::from("/x/Song.MP3"), 10, &mapper);
        assert_eq!(record.extension, "mp3");
        assert_eq!(record.category, Category::Audio);

        let record = FileRecord::new(PathBuf::from("/x/Makefile"), 10, &mapper);
        assert_eq!(record.extension, "");
        assert_eq!(record.category, Category::Other);
    }

    #[test]
    fn test_file_record_digest_is_cached() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").expect("Failed to write file");

        let mut record = FileRecord::new(path.clone(), 5, &FileMapper::default());
        let first = record.digest().expect("Failed to hash");
        fs::remove_file(&path).expect("Failed to delete file");
        assert_eq!(record.digest().expect("cached digest"), first);
    }

    #[test]
    fn test_content_index_first_wins() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let a = temp_dir.path().join("a");
        fs::write(&a, "same").unwrap();
        let digest = hasher::digest(&a).unwrap();

        let mut index = ContentIndex::new();
        assert_eq!(index.insert(digest, Path::new("/first")), None);
        assert_eq!(index.insert(digest, Path::new("/second")), Some(Path::new("/first")));
        assert_eq!(index.len(), 1);
        assert_eq!(index.insert(digest, Path::new("/third")), Some(Path::new("/first")));
    }

    #[test]
    fn test_invalid_root() {
        let result = organize(Path::new("/non/existent/path"), false);
        assert!(matches!(result, Err(OrganizeError::InvalidPath { .. })));
    }

    #[test]
    fn test_root_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let result = organize(&file, true);
        assert!(matches!(result, Err(OrganizeError::InvalidPath { .. })));
    }

    #[test]
    fn test_dry_run_plans_distinct_names_for_same_file_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("one")).unwrap();
        fs::create_dir(root.join("two")).unwrap();
        fs::write(root.join("one/notes.txt"), "first").unwrap();
        fs::write(root.join("two/notes.txt"), "second").unwrap();

        let planned = organize(root, true).expect("dry run failed");
        let targets: Vec<_> = planned.moves.iter().map(|m| m.to.clone()).collect();
        assert_eq!(
            targets,
            vec![
                root.join("Documents/notes.txt"),
                root.join("Documents/notes(1).txt")
            ]
        );

        let performed = organize(root, false).expect("organize failed");
        assert_eq!(performed.moves, planned.moves);
    }

    #[test]
    fn test_dry_run_reports_blocked_category_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("A.jpg"), "first image").unwrap();
        fs::write(root.join("Images"), "not a folder").unwrap();
        fs::write(root.join("b.txt"), "notes").unwrap();
        fs::write(root.join("x.jpg"), "second image").unwrap();

        let planned = organize(root, true).expect("dry run failed");
        assert_eq!(planned.errors.len(), 1);
        assert!(matches!(
            &planned.errors[0],
            OrganizeError::CreateDir { path, .. } if *path == root.join("Images")
        ));
        assert!(root.join("Images").is_file());

        let performed = organize(root, false).expect("organize failed");
        assert_eq!(performed.moves, planned.moves);
        assert_eq!(performed.errors.len(), 1);
        assert!(matches!(
            &performed.errors[0],
            OrganizeError::CreateDir { path, .. } if *path == root.join("Images")
        ));
        // Once the blocking file has moved to Others, later images go through.
        assert!(root.join("Images/x.jpg").is_file());
        assert!(root.join("Others/Images").is_file());
        assert!(root.join("A.jpg").is_file());
    }

    #[test]
    fn test_freed_bytes_counts_duplicate_sizes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "twelve bytes").unwrap();
        fs::write(root.join("b.txt"), "twelve bytes").unwrap();
        fs::write(root.join("c.txt"), "twelve bytes").unwrap();

        let report = organize(root, true).expect("dry run failed");
        assert_eq!(report.duplicates.len(), 2);
        assert_eq!(report.duplicates[0].bytes, 12);
        assert_eq!(report.freed_bytes(), 24);
    }

    #[test]
    fn test_category_counts() {
        let report = OrganizeReport {
            moves: vec![
                MoveEntry::new("/r/a.txt", "/r/Documents/a.txt"),
                MoveEntry::new("/r/b.md", "/r/Documents/b.md"),
                MoveEntry::new("/r/c.jpg", "/r/Images/c.jpg"),
            ],
            ..OrganizeReport::default()
        };

        let counts = report.category_counts();
        assert_eq!(counts.get("Documents"), Some(&2));
        assert_eq!(counts.get("Images"), Some(&1));
        assert!(report.success());
    }
}
