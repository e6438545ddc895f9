//! File discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

/// Discovers every regular file under a root directory.
///
/// Hidden files are included. Symlinks to files are included only when their
/// target resolves inside the root; symlinked directories are not followed. An optional excluded directory (the output
/// root when it lives inside the input root) is skipped entirely.
pub(crate) struct Scanner {
    root: PathBuf,
    exclude: Option<PathBuf>,
}

impl Scanner {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan (canonical)
    /// * `exclude` - Directory to skip (absolute, same form as `root`)
    pub fn new(root: PathBuf, exclude: Option<PathBuf>) -> Self {
        Self { root, exclude }
    }

    /// Scan the tree and return file paths relative to the root, sorted.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.scan_directory(&self.root, &mut files);
        files.sort();
        files
    }

    fn scan_directory(&self, dir_path: &Path, files: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir_path.display(), error = %e, "Cannot read directory, skipping");
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if self.exclude.as_deref() == Some(path.as_path()) {
                    tracing::debug!(path = %path.display(), "Skipping output directory");
                    continue;
                }
                self.scan_directory(&path, files);
            } else if file_type.is_file() || (file_type.is_symlink() && self.links_inside(&path)) {
                if let Ok(relative) = path.strip_prefix(&self.root) {
                    files.push(relative.to_path_buf());
                }
            }
        }
    }

    /// Symlink that resolves to a regular file under the root.
    fn links_inside(&self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(target) if target.starts_with(&self.root) => target.is_file(),
            Ok(target) => {
                tracing::warn!(
                    path = %path.display(),
                    target = %target.display(),
                    "Symlink points outside the input directory, skipping"
                );
                false
            }
            Err(_) => false,
        }
    }
}
