//! Soft failures reported while processing directives.

use std::fmt;

use injecto_data::FormatError;

/// A directive that could not be applied.
///
/// Warnings never abort processing: the offending directive is a no-op and
/// the rest of the file is processed normally. Line numbers are 1-based and
/// point at the directive line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveWarning {
    /// The directive's path does not resolve in the data tree.
    PathNotFound {
        /// Directive line.
        line: usize,
        /// Dotted path.
        path: String,
    },
    /// The parameter's path resolves to null.
    NullValue {
        /// Directive line.
        line: usize,
        /// Dotted path.
        path: String,
    },
    /// A section end marker does not close the innermost open section.
    MismatchedSectionEnd {
        /// Marker line.
        line: usize,
        /// Key named by the end marker.
        key: String,
        /// Key of the innermost open section, if any.
        open: Option<String>,
    },
    /// The line after a parameter directive has no `key:` / `key =` shape.
    NoAssignmentTarget {
        /// Directive line.
        line: usize,
        /// Dotted path.
        path: String,
    },
    /// A parameter directive is the last line of the file.
    DirectiveOnLastLine {
        /// Directive line.
        line: usize,
        /// Dotted path.
        path: String,
    },
    /// The resolved value cannot be rendered into a line.
    UnsupportedValue {
        /// Directive line.
        line: usize,
        /// Dotted path.
        path: String,
        /// Formatter error.
        error: FormatError,
    },
}

impl DirectiveWarning {
    /// Line the warning refers to (1-based).
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::PathNotFound { line, .. }
            | Self::NullValue { line, .. }
            | Self::MismatchedSectionEnd { line, .. }
            | Self::NoAssignmentTarget { line, .. }
            | Self::DirectiveOnLastLine { line, .. }
            | Self::UnsupportedValue { line, .. } => *line,
        }
    }
}

impl fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { line, path } => {
                write!(f, "line {line}: path '{path}' not found in the data values")
            }
            Self::NullValue { line, path } => {
                write!(f, "line {line}: path '{path}' is null, value left unchanged")
            }
            Self::MismatchedSectionEnd { line, key, open } => {
                write!(f, "line {line}: mismatched @section end tag '{key}'")?;
                match open {
                    Some(open) => write!(f, " (innermost open section is '{open}')"),
                    None => write!(f, " (no section is open)"),
                }
            }
            Self::NoAssignmentTarget { line, path } => write!(
                f,
                "line {line}: found @param for '{path}' but the next line has no 'key: value' or 'key = value' pattern"
            ),
            Self::DirectiveOnLastLine { line, path } => {
                write!(f, "line {line}: @param for '{path}' is on the last line")
            }
            Self::UnsupportedValue { line, path, error } => {
                write!(f, "line {line}: cannot write value of '{path}': {error}")
            }
        }
    }
}
