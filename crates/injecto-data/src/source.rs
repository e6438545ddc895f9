//! Data sources and YAML parsing.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

/// A single structured-value source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// YAML or JSON file on disk.
    File(PathBuf),
    /// YAML or JSON text already in memory (e.g. an uploaded file).
    Inline {
        /// Name used in log and error messages.
        name: String,
        /// Document text.
        text: String,
    },
}

impl DataSource {
    /// Create a file source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Create an in-memory source.
    #[must_use]
    pub fn inline(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Inline {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Display name of the source.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::File(path) => path.to_string_lossy(),
            Self::Inline { name, .. } => Cow::Borrowed(name),
        }
    }

    /// Read and parse the source into a mapping.
    ///
    /// Returns `Ok(None)` for an empty document.
    pub(crate) fn load(&self) -> Result<Option<Mapping>, DataError> {
        match self {
            Self::File(path) => {
                let text = read_source_file(path)?;
                parse_mapping(&text, &path.to_string_lossy())
            }
            Self::Inline { name, text } => parse_mapping(text, name),
        }
    }
}

/// Error loading a data source. All variants abort the run.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The data source does not exist or is not a regular file.
    #[error("Data file not found: {}", .0.display())]
    DataSourceNotFound(PathBuf),

    /// The data source exists but could not be read.
    #[error("Failed to read data file {}: {source}", path.display())]
    Io {
        /// Path of the data file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The data source is not valid YAML or its root is not a mapping.
    #[error("Invalid data in {source_name}: {message}")]
    DataFormatError {
        /// Display name of the offending source.
        source_name: String,
        /// What went wrong.
        message: String,
    },
}

fn read_source_file(path: &Path) -> Result<String, DataError> {
    if !path.is_file() {
        return Err(DataError::DataSourceNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse YAML text whose root must be a mapping.
///
/// Empty documents and an explicit `null` root yield `None`.
fn parse_mapping(text: &str, source_name: &str) -> Result<Option<Mapping>, DataError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_yaml::from_str(text).map_err(|e| DataError::DataFormatError {
        source_name: source_name.to_owned(),
        message: format!("Invalid YAML: {e}"),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(Some(mapping)),
        Value::Null => Ok(None),
        _ => Err(DataError::DataFormatError {
            source_name: source_name.to_owned(),
            message: "root must be a mapping".to_owned(),
        }),
    }
}
