/// File categorization by extension.
///
/// Categories and their extensions live in one static table, [`CATEGORY_TABLE`].
/// [`FileMapper`] inverts that table once into an extension lookup, and
/// [`classify`] uses a process-wide mapper built on first use.
///
/// # Examples
///
/// ```
/// use tidyup::file_category::{Category, classify};
///
/// assert_eq!(classify("mp3"), Category::Audio);
/// assert_eq!(classify("MP3"), Category::Audio);
/// assert_eq!(classify(".pdf"), Category::Document);
/// assert_eq!(classify(""), Category::Other);
/// ```
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Represents a broad file category.
///
/// Each category becomes one subfolder directly under the organized root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Video files (MP4, MKV, AVI, etc.)
    Video,
    /// Image files (PNG, JPG, GIF, etc.)
    Image,
    /// Document files (PDF, DOCX, TXT, etc.)
    Document,
    /// Spreadsheet files (XLSX, CSV, ODS, etc.)
    Spreadsheet,
    /// Presentation files (PPTX, ODP, KEY, etc.)
    Presentation,
    /// Code/Source files (Rust, Python, HTML, etc.)
    Code,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archive,
    /// Installers and binaries (EXE, DEB, DMG, etc.)
    Executable,
    /// Font files (TTF, OTF, WOFF, etc.)
    Font,
    /// Unknown extension or no extension at all
    Other,
}

/// Every category with the extensions it owns. An extension appears at most once.
pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Audio,
        &[
            "mp3", "wav", "aac", "flac", "m4a", "ogg", "wma", "aiff", "alac", "opus",
        ],
    ),
    (
        Category::Video,
        &[
            "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "3gp", "mpeg", "mpg",
        ],
    ),
    (
        Category::Image,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "svg", "ico", "heic", "raw",
            "cr2", "nef",
        ],
    ),
    (
        Category::Document,
        &["pdf", "doc", "docx", "txt", "rtf", "odt", "md", "epub"],
    ),
    (Category::Spreadsheet, &["xls", "xlsx", "csv", "ods", "tsv"]),
    (Category::Presentation, &["ppt", "pptx", "odp", "key"]),
    (
        Category::Code,
        &[
            "py", "java", "c", "cpp", "js", "ts", "html", "css", "json", "xml", "sh", "php",
            "go", "rs", "kt", "swift", "rb", "sql", "yaml", "yml",
        ],
    ),
    (
        Category::Archive,
        &["zip", "rar", "7z", "tar", "gz", "bz2", "xz", "iso"],
    ),
    (
        Category::Executable,
        &[
            "exe", "msi", "deb", "rpm", "appimage", "dmg", "pkg", "bin", "run",
        ],
    ),
    (Category::Font, &["ttf", "otf", "woff", "woff2", "eot"]),
];

impl Category {
    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "Images");
    /// assert_eq!(Category::Audio.dir_name(), "Audio");
    /// assert_eq!(Category::Other.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Audio => "Audio",
            Category::Video => "Video",
            Category::Image => "Images",
            Category::Document => "Documents",
            Category::Spreadsheet => "Spreadsheets",
            Category::Presentation => "Presentations",
            Category::Code => "Code",
            Category::Archive => "Archives",
            Category::Executable => "Executables",
            Category::Font => "Fonts",
            Category::Other => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps file extensions to categories.
///
/// Built by inverting [`CATEGORY_TABLE`]; lookups are case-insensitive and
/// ignore a leading dot.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<String, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` with all standard mappings.
    pub fn new() -> Self {
        let extension_map = CATEGORY_TABLE
            .iter()
            .flat_map(|(category, extensions)| {
                extensions.iter().map(move |ext| (ext.to_string(), *category))
            })
            .collect();
        Self { extension_map }
    }

    /// Maps a file extension to a category, if the table knows it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyup::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Document));
    /// assert_eq!(mapper.extension_to_category("PNG"), Some(Category::Image));
    /// assert_eq!(mapper.extension_to_category("xyz123"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        let ext = normalize_extension(ext);
        self.extension_map.get(&ext).copied()
    }

    /// Determines the category for an extension, falling back to `Category::Other`.
    pub fn categorize(&self, ext: &str) -> Category {
        self.extension_to_category(ext).unwrap_or(Category::Other)
    }

    /// Determines the category for a path from its last extension.
    ///
    /// Files without an extension (including dotfiles such as `.bashrc`) are
    /// `Category::Other`.
    pub fn categorize_path(&self, path: &Path) -> Category {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Category::Other, |ext| self.categorize(ext))
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

static MAPPER: LazyLock<FileMapper> = LazyLock::new(FileMapper::new);

/// Classifies an extension such as `"jpg"`, `".JPG"` or `""`.
pub fn classify(ext: &str) -> Category {
    MAPPER.categorize(ext)
}

/// Lowercases an extension and strips a leading separator.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Audio.dir_name(), "Audio");
        assert_eq!(Category::Video.dir_name(), "Video");
        assert_eq!(Category::Image.dir_name(), "Images");
        assert_eq!(Category::Document.dir_name(), "Documents");
        assert_eq!(Category::Spreadsheet.dir_name(), "Spreadsheets");
        assert_eq!(Category::Presentation.dir_name(), "Presentations");
        assert_eq!(Category::Code.dir_name(), "Code");
        assert_eq!(Category::Archive.dir_name(), "Archives");
        assert_eq!(Category::Executable.dir_name(), "Executables");
        assert_eq!(Category::Font.dir_name(), "Fonts");
        assert_eq!(Category::Other.dir_name(), "Others");
    }

    #[test]
    fn test_no_extension_in_two_categories() {
        let mut seen = HashSet::new();
        for (_, extensions) in CATEGORY_TABLE {
            assert!(!extensions.is_empty());
            for ext in *extensions {
                assert!(seen.insert(*ext), "extension {} listed twice", ext);
                assert_eq!(*ext, ext.to_lowercase());
                assert!(!ext.starts_with('.'));
            }
        }
    }

    #[test]
    fn test_extension_to_category() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Document));
        assert_eq!(mapper.extension_to_category("mp3"), Some(Category::Audio));
        assert_eq!(mapper.extension_to_category("rs"), Some(Category::Code));
        assert_eq!(mapper.extension_to_category("html"), Some(Category::Code));
        assert_eq!(mapper.extension_to_category("dmg"), Some(Category::Executable));
    }

    #[test]
    fn test_extension_to_category_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.extension_to_category("PDF"), Some(Category::Document));
        assert_eq!(mapper.extension_to_category("Mp3"), Some(Category::Audio));
        assert_eq!(classify("MP3"), classify("mp3"));
    }

    #[test]
    fn test_leading_dot_is_ignored() {
        assert_eq!(classify(".jpg"), Category::Image);
        assert_eq!(classify(".JPG"), Category::Image);
    }

    #[test]
    fn test_categorize_defaults_to_other() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(""), Category::Other);
        assert_eq!(mapper.categorize("xyz123"), Category::Other);
        assert_eq!(classify("unknown"), Category::Other);
    }

    #[test]
    fn test_categorize_path_uses_last_extension() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize_path(Path::new("backup.tar.gz")), Category::Archive);
        assert_eq!(mapper.categorize_path(Path::new("notes.final.TXT")), Category::Document);
        assert_eq!(mapper.categorize_path(Path::new("Makefile")), Category::Other);
        assert_eq!(mapper.categorize_path(Path::new(".bashrc")), Category::Other);
    }
}
