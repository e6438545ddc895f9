//! Error types for directory processing.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Fatal errors that stop a run before any file is processed.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Input root is missing or not a directory.
    #[error("Input directory not found: {}", .0.display())]
    InputDirectoryNotFound(PathBuf),

    /// Output root could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateOutputDir {
        /// Output root.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Stage of per-file processing that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// Reading the input file.
    Read,
    /// Decoding the input as UTF-8.
    Decode,
    /// Writing the modified output file.
    Write,
    /// Copying the unmodified file to the output tree.
    Copy,
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Decode => "decode",
            Self::Write => "write",
            Self::Copy => "copy",
        })
    }
}

/// Per-file failure. Recorded in the report; the run continues.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {kind} {}: {source}", path.display())]
pub struct FileError {
    /// Path relative to the input root.
    pub path: PathBuf,
    /// Failing stage.
    pub kind: FileErrorKind,
    /// Underlying error.
    #[source]
    pub source: io::Error,
}

impl FileError {
    pub(crate) fn new(path: PathBuf, kind: FileErrorKind, source: io::Error) -> Self {
        Self { path, kind, source }
    }
}
