use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::SourceError;

/// Scratch directory for one run, deleted on drop.
///
/// Layout: `input/` for uploaded files, `output/` for results, `clone/` for
/// the git checkout (created by `git clone`).
#[derive(Debug)]
pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    /// Create a fresh workspace with empty `input/` and `output/` dirs.
    pub fn new() -> Result<Self, SourceError> {
        let root = tempfile::Builder::new()
            .prefix("injecto-")
            .tempdir()
            .map_err(SourceError::Workspace)?;
        let workspace = Self { root };
        std::fs::create_dir(workspace.input_dir()).map_err(SourceError::Workspace)?;
        std::fs::create_dir(workspace.output_dir()).map_err(SourceError::Workspace)?;
        tracing::debug!(path = %workspace.path().display(), "Created temporary workspace");
        Ok(workspace)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        self.path().join("input")
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.path().join("output")
    }

    #[must_use]
    pub fn clone_dir(&self) -> PathBuf {
        self.path().join("clone")
    }

    /// Remove the workspace now, logging instead of failing.
    pub fn close(self) {
        let path = self.path().to_path_buf();
        match self.root.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed temporary workspace"),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to remove temporary workspace");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let workspace = Workspace::new().unwrap();
        assert!(workspace.input_dir().is_dir());
        assert!(workspace.output_dir().is_dir());
        assert!(!workspace.clone_dir().exists());
        let name = workspace.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("injecto-"));
    }

    #[test]
    fn test_drop_removes_directory() {
        let workspace = Workspace::new().unwrap();
        let path = workspace.path().to_path_buf();
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_removes_directory() {
        let workspace = Workspace::new().unwrap();
        let path = workspace.path().to_path_buf();
        workspace.close();
        assert!(!path.exists());
    }
}
