//! Destination conflict resolution.
//!
//! A taken destination `name.ext` is retried as `name(1).ext`, `name(2).ext`,
//! and so on. The search only asks whether a candidate path is occupied, so
//! the result never depends on directory listing order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Returns `destination` if nothing exists there, otherwise the first free
/// numbered variant.
///
/// # Examples
///
/// ```
/// use tidyup::conflict::resolve;
/// use std::path::Path;
///
/// let free = Path::new("/definitely/not/here/report.pdf");
/// assert_eq!(resolve(free), free);
/// ```
pub fn resolve(destination: &Path) -> PathBuf {
    resolve_with(destination, |candidate| candidate.exists())
}

/// Same search as [`resolve`] with a caller-supplied occupancy check.
///
/// Dry runs use this to treat destinations planned earlier in the same pass
/// as taken.
pub fn resolve_with<F>(destination: &Path, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !is_taken(destination) {
        return destination.to_path_buf();
    }

    (1u64..)
        .map(|n| numbered_variant(destination, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| destination.to_path_buf())
}

/// Builds `stem(n).ext` next to `path`.
///
/// The last dot is the extension boundary. Names without an extension get the
/// suffix at the end, and a leading dot (`.env`) is part of the stem.
///
/// ```
/// use tidyup::conflict::numbered_variant;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(numbered_variant(Path::new("a/b.tar.gz"), 2), PathBuf::from("a/b.tar(2).gz"));
/// assert_eq!(numbered_variant(Path::new("a/README"), 1), PathBuf::from("a/README(1)"));
/// ```
pub fn numbered_variant(path: &Path, n: u64) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = path.file_stem() {
        name.push(stem);
    }
    name.push(format!("({})", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}
