//! Directory listing, extension filtering, and ordering of bundle inputs.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::domain::errors::BundleError;
use crate::domain::model::{FileEntry, LanguageFilter, SortMode};

/// Configuration inputs for the scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub root: PathBuf,
    pub language: LanguageFilter,
    pub sort: SortMode,
    pub ignore_globs: Vec<String>,
    /// File left out of the listing, normally the bundle output itself.
    pub exclude: Option<PathBuf>,
}

impl ScannerConfig {
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            language: LanguageFilter::All,
            sort: SortMode::None,
            ignore_globs: Vec::new(),
            exclude: None,
        }
    }

    pub fn with_language(mut self, language: LanguageFilter) -> Self {
        self.language = language;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_ignore_globs(mut self, globs: Vec<String>) -> Self {
        self.ignore_globs = globs;
        self
    }

    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude = Some(path.into());
        self
    }
}

/// Lists the files directly inside a directory.
#[derive(Debug, Default)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Self
    }

    /// Files of `cfg.root` that pass the filters, in bundle order.
    pub fn scan(&self, cfg: &ScannerConfig) -> Result<Vec<FileEntry>, BundleError> {
        let ignored = build_ignore_matcher(&cfg.ignore_globs)?;
        let mut files: Vec<FileEntry> = list_files(&cfg.root)?
            .into_iter()
            .filter(|path| !is_excluded(path, cfg.exclude.as_deref()))
            .filter(|path| {
                path.file_name()
                    .is_none_or(|name| !ignored.is_match(Path::new(name)))
            })
            .map(FileEntry::new)
            .filter(|entry| cfg.language.matches(entry))
            .collect();

        sort_entries(&mut files, cfg.sort);
        tracing::debug!(root = %cfg.root.display(), count = files.len(), "scanned directory");
        Ok(files)
    }
}

fn list_files(root: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(Some(1))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result.map_err(|source| BundleError::Listing {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_some_and(|kind| kind.is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_excluded(path: &Path, exclude: Option<&Path>) -> bool {
    let Some(exclude) = exclude else {
        return false;
    };
    if path == exclude {
        return true;
    }
    match (path.canonicalize(), exclude.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn build_ignore_matcher(patterns: &[String]) -> Result<GlobSet, BundleError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| BundleError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| BundleError::InvalidGlob {
        pattern: patterns.join(" "),
        source,
    })
}

/// Stable in-place ordering of entries.
pub fn sort_entries(entries: &mut [FileEntry], mode: SortMode) {
    match mode {
        SortMode::Alphabetic => entries.sort_by(|a, b| a.path().cmp(b.path())),
        SortMode::Language => entries.sort_by(|a, b| a.extension().cmp(b.extension())),
        SortMode::None => {}
    }
}
