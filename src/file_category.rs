//! Extension-based file classification.
//!
//! This module maps a file's extension to a category and a second-level
//! subfolder label. Media categories are bucketed by the year of the file's
//! modification time; every other category is bucketed by the bare extension.
//!
//! # Examples
//!
//! ```
//! use maestro::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify(".jpg"), "Images");
//! assert_eq!(table.classify(".pdf"), "Documents");
//! assert_eq!(table.classify(".xyz"), "Others");
//! ```

use chrono::{DateTime, Datelike, Local};
use std::fs;
use std::path::Path;

/// A single category: a name plus the extension set it claims.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Directory name used for this category in the destination tree.
    pub name: String,
    /// Lowercase extensions including the leading dot (e.g. ".jpg").
    pub extensions: Vec<String>,
}

impl CategoryRule {
    /// Creates a rule from a name and a list of dot-prefixed extensions.
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Ordered mapping from category name to extension set.
///
/// Iteration order is significant: when an extension appears in more than
/// one category, the first category in table order wins. `classify` relies
/// on this to stay deterministic even for ill-formed tables with duplicate
/// extensions.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<CategoryRule>,
    date_bucketed: Vec<String>,
    fallback: String,
    unknown_year: String,
}

impl CategoryTable {
    /// Creates a table from explicit parts.
    ///
    /// # Arguments
    ///
    /// * `categories` - category rules in priority order
    /// * `date_bucketed` - names of categories whose subfolder is the
    ///   modification-time year rather than the extension
    /// * `fallback` - category returned for extensions no rule claims
    /// * `unknown_year` - subfolder label used when the modification time
    ///   cannot be read
    pub fn new(
        categories: Vec<CategoryRule>,
        date_bucketed: Vec<String>,
        fallback: String,
        unknown_year: String,
    ) -> Self {
        Self {
            categories,
            date_bucketed,
            fallback,
            unknown_year,
        }
    }

    /// Returns the category for a normalized extension.
    ///
    /// The input must be lowercase and include the leading dot (empty
    /// string for files without an extension); `extension_of` produces
    /// exactly this form. Returns the fallback category when no rule
    /// claims the extension. Total: never fails for any input string.
    pub fn classify(&self, ext: &str) -> &str {
        for rule in &self.categories {
            if rule.extensions.iter().any(|e| e == ext) {
                return &rule.name;
            }
        }
        &self.fallback
    }

    /// Returns the subfolder label for a file within its category.
    ///
    /// Date-bucketed categories use the four-digit year of the file's
    /// modification time; if the metadata cannot be read the unknown-year
    /// sentinel is returned instead. All other categories use the
    /// extension with the leading dot stripped. A file without an
    /// extension yields an empty label, which joins away to nothing when
    /// the destination path is built; that is intentional.
    pub fn subfolder(&self, category: &str, path: &Path) -> String {
        if self.is_date_bucketed(category) {
            modified_year(path).unwrap_or_else(|| self.unknown_year.clone())
        } else {
            extension_of(path).trim_start_matches('.').to_string()
        }
    }

    /// Whether a category buckets its files by modification year.
    pub fn is_date_bucketed(&self, category: &str) -> bool {
        self.date_bucketed.iter().any(|c| c == category)
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.categories
    }

    /// The category returned for unmatched extensions.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(
            vec![
                CategoryRule::new(
                    "Images",
                    &[
                        ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".svg",
                        ".webp", ".heic", ".ico", ".raw", ".psd", ".ai", ".indd",
                    ],
                ),
                CategoryRule::new(
                    "Videos",
                    &[
                        ".mp4", ".mov", ".avi", ".mkv", ".flv", ".wmv", ".webm", ".mpeg",
                        ".mpg", ".3gp", ".m4v", ".vob",
                    ],
                ),
                CategoryRule::new(
                    "Music",
                    &[
                        ".mp3", ".flac", ".wav", ".aac", ".ogg", ".wma", ".m4a", ".alac",
                        ".aiff", ".opus",
                    ],
                ),
                CategoryRule::new(
                    "Documents",
                    &[
                        ".pdf", ".docx", ".doc", ".xlsx", ".xls", ".pptx", ".ppt", ".txt",
                        ".odt", ".ods", ".odp", ".rtf", ".tex", ".csv", ".md", ".log",
                    ],
                ),
                CategoryRule::new(
                    "Archives",
                    &[
                        ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".dmg",
                        ".cab",
                    ],
                ),
                CategoryRule::new(
                    "Executables",
                    &[".exe", ".msi", ".bat", ".cmd", ".sh", ".jar", ".app", ".apk"],
                ),
                CategoryRule::new("Fonts", &[".ttf", ".otf", ".woff", ".woff2", ".fnt"]),
                CategoryRule::new(
                    "Scripts_and_Code",
                    &[
                        ".py", ".js", ".ts", ".java", ".c", ".cpp", ".cs", ".rb", ".php",
                        ".html", ".css", ".json", ".xml", ".sql", ".sh", ".pl", ".go", ".rs",
                        ".swift", ".kt",
                    ],
                ),
                CategoryRule::new(
                    "Disk_Images",
                    &[".iso", ".img", ".bin", ".cue", ".mdf", ".mds"],
                ),
                CategoryRule::new(
                    "3D_Models",
                    &[".obj", ".fbx", ".stl", ".dae", ".3ds", ".blend", ".ply"],
                ),
                CategoryRule::new(
                    "Others",
                    &[".bak", ".tmp", ".log", ".dat", ".cfg", ".ini"],
                ),
            ],
            vec!["Images".to_string(), "Videos".to_string()],
            "Others".to_string(),
            "UnknownYear".to_string(),
        )
    }
}

/// Returns the file's extension, lowercased, with the leading dot.
///
/// Only the final extension counts ("archive.tar.gz" -> ".gz"); a
/// leading-dot name (".env") or trailing-dot name ("data.") has no
/// extension, and a file name that is not valid UTF-8 is treated as
/// extensionless.
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return String::new();
    };
    split_name(name).1.to_lowercase()
}

/// Splits a file name into (stem, extension-with-dot).
///
/// The stem keeps every earlier dot; the extension is empty when the name
/// has no dot, starts with its only dot, or ends with a dot.
pub(crate) fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Four-digit year of the file's modification time, local timezone.
fn modified_year(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let stamp: DateTime<Local> = modified.into();
    Some(stamp.year().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn classify_known_extensions() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".jpg"), "Images");
        assert_eq!(table.classify(".mkv"), "Videos");
        assert_eq!(table.classify(".flac"), "Music");
        assert_eq!(table.classify(".pdf"), "Documents");
        assert_eq!(table.classify(".zip"), "Archives");
        assert_eq!(table.classify(".ttf"), "Fonts");
        assert_eq!(table.classify(".rs"), "Scripts_and_Code");
        assert_eq!(table.classify(".blend"), "3D_Models");
    }

    #[test]
    fn classify_unknown_extension_falls_back() {
        let table = CategoryTable::default();
        assert_eq!(table.classify(".xyz"), "Others");
        assert_eq!(table.classify(""), "Others");
        assert_eq!(table.classify("not-an-extension"), "Others");
    }

    #[test]
    fn classify_first_match_wins_on_duplicates() {
        let table = CategoryTable::default();
        // .iso appears in both Archives and Disk_Images; Archives is first.
        assert_eq!(table.classify(".iso"), "Archives");
        // .sh appears in both Executables and Scripts_and_Code.
        assert_eq!(table.classify(".sh"), "Executables");
        // .log appears in both Documents and Others.
        assert_eq!(table.classify(".log"), "Documents");
    }

    #[test]
    fn extension_of_normalizes() {
        assert_eq!(extension_of(Path::new("photo.JPG")), ".jpg");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".env")), "");
        assert_eq!(extension_of(Path::new("data.")), "");
        assert_eq!(extension_of(Path::new("/some/dir/report.PDF")), ".pdf");
    }

    #[test]
    fn split_name_keeps_earlier_dots_in_stem() {
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("photo.jpg"), ("photo", ".jpg"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".env"), (".env", ""));
        assert_eq!(split_name("data."), ("data.", ""));
    }

    #[test]
    fn subfolder_uses_extension_for_plain_categories() {
        let table = CategoryTable::default();
        assert_eq!(table.subfolder("Documents", Path::new("report.pdf")), "pdf");
        assert_eq!(table.subfolder("Archives", Path::new("backup.tar.GZ")), "gz");
        // Extensionless files get an empty label that joins away later.
        assert_eq!(table.subfolder("Others", Path::new("README")), "");
    }

    #[test]
    fn subfolder_uses_year_for_media() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("photo.jpg");
        File::create(&path).expect("create file");

        let table = CategoryTable::default();
        let label = table.subfolder("Images", &path);
        // Freshly created file: mtime is "now", so the label is this year.
        let this_year = Local::now().year().to_string();
        assert_eq!(label, this_year);
    }

    #[test]
    fn subfolder_falls_back_when_mtime_unreadable() {
        let table = CategoryTable::default();
        let label = table.subfolder("Images", Path::new("/no/such/file.jpg"));
        assert_eq!(label, "UnknownYear");
    }

    #[test]
    fn custom_table_order_is_respected() {
        let table = CategoryTable::new(
            vec![
                CategoryRule::new("First", &[".dup"]),
                CategoryRule::new("Second", &[".dup", ".only"]),
            ],
            vec![],
            "Rest".to_string(),
            "NoYear".to_string(),
        );
        assert_eq!(table.classify(".dup"), "First");
        assert_eq!(table.classify(".only"), "Second");
        assert_eq!(table.classify(".none"), "Rest");
    }
}
