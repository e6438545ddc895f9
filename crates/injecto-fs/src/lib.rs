//! Directory processing for Injecto.
//!
//! Walks an input directory, runs the directive [`Engine`] over every file
//! and mirrors the result into an output directory. When the output
//! directory is the input directory, files are edited in place and untouched
//! files are not rewritten.
//!
//! Per-file I/O and decode failures are collected in the [`ProcessReport`]
//! and never abort the run.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use injecto_data::{DataSource, load_and_merge};
//!
//! let data = load_and_merge(&[DataSource::file("values.yaml")])?;
//! let report = injecto_fs::process_files(Path::new("templates"), Path::new("rendered"), &data)?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod report;
mod scanner;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use injecto_data::DataTree;
use injecto_engine::Engine;

pub use error::{FileError, FileErrorKind, ProcessError};
pub use report::{FileOutcome, FileReport, ProcessCounters, ProcessReport};

use scanner::Scanner;

/// Process every file under `input_dir` into `output_dir`.
///
/// # Errors
///
/// Returns [`ProcessError::InputDirectoryNotFound`] if `input_dir` is not a
/// directory and [`ProcessError::CreateOutputDir`] if the output root cannot
/// be created. Failures on individual files are reported in
/// [`ProcessReport::failures`].
pub fn process_files(
    input_dir: &Path,
    output_dir: &Path,
    data: &DataTree,
) -> Result<ProcessReport, ProcessError> {
    tracing::info!(input = %input_dir.display(), output = %output_dir.display(), "Starting file processing");

    if !input_dir.is_dir() {
        return Err(ProcessError::InputDirectoryNotFound(input_dir.to_path_buf()));
    }
    let input_root = input_dir
        .canonicalize()
        .map_err(|_| ProcessError::InputDirectoryNotFound(input_dir.to_path_buf()))?;

    fs::create_dir_all(output_dir).map_err(|source| ProcessError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let output_root = output_dir
        .canonicalize()
        .map_err(|source| ProcessError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let in_place = input_root == output_root;
    let exclude = (!in_place && output_root.starts_with(&input_root)).then(|| output_root.clone());

    let engine = Engine::new(data);
    let mut report = ProcessReport::default();

    for relative in Scanner::new(input_root.clone(), exclude).scan() {
        let source = input_root.join(&relative);
        let target = output_root.join(&relative);
        tracing::info!(file = %relative.display(), "Processing file");

        match process_file(&engine, &source, &target, &relative, in_place) {
            Ok(file) => {
                for warning in &file.warnings {
                    tracing::warn!(file = %relative.display(), "{warning}");
                }
                report.record(file);
            }
            Err(err) => {
                tracing::error!(file = %relative.display(), error = %err, "Failed to process file");
                report.failures.push(err);
            }
        }
    }

    tracing::info!(
        files_processed = report.files_processed(),
        failures = report.failures.len(),
        "File processing finished. {}",
        report.summary()
    );
    Ok(report)
}

fn process_file(
    engine: &Engine<'_>,
    source: &Path,
    target: &Path,
    relative: &Path,
    in_place: bool,
) -> Result<FileReport, FileError> {
    let fail = |kind| move |err| FileError::new(relative.to_path_buf(), kind, err);

    let bytes = fs::read(source).map_err(fail(FileErrorKind::Read))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        .map_err(fail(FileErrorKind::Decode))?;

    let processed = engine.process(&text);

    let outcome = if processed.changed {
        ensure_parent(target).map_err(fail(FileErrorKind::Write))?;
        fs::write(target, &processed.text).map_err(fail(FileErrorKind::Write))?;
        tracing::info!(file = %relative.display(), "Writing modified file");
        FileOutcome::Written
    } else if in_place {
        tracing::debug!(file = %relative.display(), "Skipping unmodified file (in-place edit)");
        FileOutcome::Unchanged
    } else {
        ensure_parent(target).map_err(fail(FileErrorKind::Copy))?;
        copy_file(source, target).map_err(fail(FileErrorKind::Copy))?;
        tracing::debug!(file = %relative.display(), "Copying unmodified file");
        FileOutcome::Copied
    };

    Ok(FileReport {
        path: relative.to_path_buf(),
        outcome,
        replacements: processed.replacements,
        section_toggles: processed.section_toggles,
        warnings: processed.warnings,
    })
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Copy contents and permissions, then carry over the modification time.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target)?;
    let modified = fs::metadata(source)?.modified()?;
    // Best effort: a read-only copy may refuse new timestamps on some platforms
    if let Err(err) = File::open(target).and_then(|file| file.set_modified(modified)) {
        tracing::debug!(path = %target.display(), error = %err, "Cannot preserve modification time");
    }
    Ok(())
}

/// Paths of files that would be processed under `input_dir`, relative to it.
///
/// Returns an empty list if the directory cannot be read.
#[must_use]
pub fn discover_files(input_dir: &Path) -> Vec<PathBuf> {
    let root = fs::canonicalize(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    Scanner::new(root, None).scan()
}
