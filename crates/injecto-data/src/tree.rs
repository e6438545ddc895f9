//! Merged value tree and dotted path resolution.

use serde_yaml::{Mapping, Value};

use crate::merge::deep_merge;

/// Merged value tree queried by dotted paths.
///
/// Built once per run from all data sources and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTree {
    root: Mapping,
}

impl DataTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping.
    #[must_use]
    pub fn from_mapping(root: Mapping) -> Self {
        Self { root }
    }

    /// Check whether the tree has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Deep-merge `incoming` into this tree. Values from `incoming` win.
    pub fn merge(&mut self, incoming: Mapping) {
        deep_merge(&mut self.root, incoming);
    }

    /// Resolve a dot-separated path (e.g. `db.port`).
    ///
    /// Returns `None` when the path is empty, a segment is missing, or an
    /// intermediate value is not a mapping. Absence is never an error.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Render the tree as pretty JSON for debug logging.
    ///
    /// Returns `None` if the tree contains values JSON cannot represent
    /// (e.g. non-string keys).
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(&self.root).ok()
    }
}

impl From<Mapping> for DataTree {
    fn from(root: Mapping) -> Self {
        Self::from_mapping(root)
    }
}
