//! Domain models for bundle options and file entries.

use std::path::{Path, PathBuf};

/// Order in which bundled files are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Lexicographic by full path.
    #[default]
    Alphabetic,
    /// Lexicographic by dotted extension, enumeration order kept for ties.
    Language,
    /// Enumeration order.
    None,
}

impl SortMode {
    /// Exact, case-sensitive match; anything else means no reordering.
    pub fn from_name(value: &str) -> Self {
        match value {
            "alphabetic" => SortMode::Alphabetic,
            "language" => SortMode::Language,
            _ => SortMode::None,
        }
    }
}

/// Which file extensions participate in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    #[default]
    All,
    /// Dotted extensions such as `.rs`, matched exactly.
    Extensions(Vec<String>),
}

impl LanguageFilter {
    /// Parse a whitespace separated extension list. Blank input and `all` disable filtering.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return LanguageFilter::All;
        };
        if raw.eq_ignore_ascii_case("all") {
            return LanguageFilter::All;
        }
        LanguageFilter::Extensions(raw.split_whitespace().map(str::to_owned).collect())
    }

    pub fn matches(&self, entry: &FileEntry) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Extensions(extensions) => {
                let extension = entry.extension();
                extensions.iter().any(|candidate| candidate == extension)
            }
        }
    }
}

/// Resolved options for a single bundle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    pub output_path: PathBuf,
    pub language: LanguageFilter,
    pub include_source_note: bool,
    pub sort: SortMode,
    pub remove_empty_lines: bool,
    pub author: Option<String>,
}

impl BundleOptions {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            language: LanguageFilter::All,
            include_source_note: false,
            sort: SortMode::default(),
            remove_empty_lines: false,
            author: None,
        }
    }

    /// Author name to stamp on each file, as given. Blank names disable the header.
    pub fn author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .filter(|author| !author.trim().is_empty())
    }
}

/// A file discovered in the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    extension: String,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = dotted_extension(&path);
        Self { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension including its leading dot, or an empty string.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Extension of the file name starting at its last `.`.
///
/// Dotfiles such as `.gitignore` are their own extension; a trailing dot yields nothing.
pub fn dotted_extension(path: &Path) -> String {
    let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(index) if index + 1 < name.len() => name[index..].to_owned(),
        _ => String::new(),
    }
}
