//! Run results: counters and per-file outcomes.

use std::path::PathBuf;

use injecto_engine::DirectiveWarning;

use crate::error::FileError;

/// Aggregate counters across all successfully processed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCounters {
    /// Files whose text changed and were written.
    pub files_modified: usize,
    /// Parameter values replaced.
    pub replacements: usize,
    /// Lines commented or uncommented by sections.
    pub section_toggles: usize,
}

/// What happened to one file's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Text changed; new content written.
    Written,
    /// Unchanged; copied verbatim to the output tree.
    Copied,
    /// Unchanged while editing in place; nothing written.
    Unchanged,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Path relative to the input root.
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub replacements: usize,
    pub section_toggles: usize,
    /// Directives that could not be applied in this file.
    pub warnings: Vec<DirectiveWarning>,
}

/// Result of a whole run.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub counters: ProcessCounters,
    /// Successfully processed files, in processing order.
    pub files: Vec<FileReport>,
    /// Files that failed with I/O or decode errors.
    pub failures: Vec<FileError>,
}

impl ProcessReport {
    /// Files processed without a per-file error.
    #[must_use]
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    /// Total directive warnings across all files.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|file| file.warnings.len()).sum()
    }

    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Modified {} files with {} value replacements and {} section line toggles",
            self.counters.files_modified, self.counters.replacements, self.counters.section_toggles
        )
    }

    pub(crate) fn record(&mut self, file: FileReport) {
        if file.outcome == FileOutcome::Written {
            self.counters.files_modified += 1;
        }
        self.counters.replacements += file.replacements;
        self.counters.section_toggles += file.section_toggles;
        self.files.push(file);
    }
}
