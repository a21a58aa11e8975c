//! Bundle execution: concatenate the selected files into the output file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::app::scan::{Scanner, ScannerConfig};
use crate::domain::errors::BundleError;
use crate::domain::model::{BundleOptions, FileEntry};
use crate::infra::console::{Level, Reporter};

/// Outcome of a successful bundle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub output_path: PathBuf,
    pub files: usize,
    pub lines: usize,
}

/// Writes bundles according to [`BundleOptions`].
#[derive(Debug, Default)]
pub struct Bundler {
    scanner: Scanner,
    ignore_globs: Vec<String>,
}

impl Bundler {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name globs skipped while listing the output directory.
    pub fn with_ignore_globs(mut self, globs: Vec<String>) -> Self {
        self.ignore_globs = globs;
        self
    }

    /// Bundle every matching file next to the output path into the output path.
    ///
    /// Nothing is created when validation fails. Once the output is opened it is truncated, and
    /// a later read or write failure leaves it partially written.
    pub fn bundle(&self, options: &BundleOptions) -> Result<BundleReport, BundleError> {
        let (output_path, directory) = resolve_output(&options.output_path)?;

        let cfg = ScannerConfig::from_root(&directory)
            .with_language(options.language.clone())
            .with_sort(options.sort)
            .with_ignore_globs(self.ignore_globs.clone())
            .excluding(&output_path);
        let files = self.scanner.scan(&cfg)?;

        let write_err = |source: std::io::Error| BundleError::Write {
            path: output_path.clone(),
            source,
        };
        let file = File::create(&output_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);

        let mut lines = 0;
        for entry in &files {
            lines += write_entry(&mut writer, entry, options).map_err(|err| match err {
                EntryError::Read(source) => BundleError::Read {
                    path: entry.path().to_path_buf(),
                    source,
                },
                EntryError::Write(source) => write_err(source),
            })?;
            tracing::debug!(path = %entry.path().display(), "bundled file");
        }
        writer.flush().map_err(write_err)?;

        tracing::info!(
            output = %output_path.display(),
            files = files.len(),
            lines,
            "bundle written"
        );
        Ok(BundleReport {
            output_path,
            files: files.len(),
            lines,
        })
    }
}

/// Command handler: run a bundle and report the outcome on the console.
pub fn run_bundle(bundler: &Bundler, options: &BundleOptions, reporter: &mut dyn Reporter) {
    match bundler.bundle(options) {
        Ok(report) => reporter.report(
            Level::Info,
            &format!(
                "File '{}' created successfully.",
                report.output_path.display()
            ),
        ),
        Err(err) => {
            tracing::debug!(error = ?err, "bundle failed");
            reporter.report(Level::Error, &format!("Error: {err}"));
        }
    }
}

fn resolve_output(raw: &Path) -> Result<(PathBuf, PathBuf), BundleError> {
    if raw.as_os_str().is_empty() || raw.to_string_lossy().trim().is_empty() {
        return Err(BundleError::MissingOutput);
    }
    let output = std::path::absolute(raw).map_err(|_| BundleError::MissingOutput)?;
    let directory = output
        .parent()
        .map(Path::to_path_buf)
        .ok_or(BundleError::MissingOutput)?;
    if !directory.is_dir() {
        return Err(BundleError::MissingDirectory(directory));
    }
    Ok((output, directory))
}

enum EntryError {
    Read(std::io::Error),
    Write(std::io::Error),
}

fn write_entry<W: Write>(
    writer: &mut W,
    entry: &FileEntry,
    options: &BundleOptions,
) -> Result<usize, EntryError> {
    if options.include_source_note {
        writeln!(writer, "# Source code: {}", entry.path().display()).map_err(EntryError::Write)?;
    }
    if let Some(author) = options.author() {
        writeln!(writer, "# Author: {author}").map_err(EntryError::Write)?;
    }

    let bytes = fs::read(entry.path()).map_err(EntryError::Read)?;
    let contents = String::from_utf8_lossy(&bytes);

    let mut written = 0;
    for line in contents.lines() {
        if options.remove_empty_lines && line.trim().is_empty() {
            continue;
        }
        writeln!(writer, "{line}").map_err(EntryError::Write)?;
        written += 1;
    }
    Ok(written)
}
