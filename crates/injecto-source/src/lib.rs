//! Input acquisition for Injecto.
//!
//! Templates either live in a local directory or in a git repository that is
//! shallow-cloned into a scratch [`Workspace`] before processing. The
//! workspace is removed when it is dropped.

mod git;
mod workspace;

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

pub use git::{GitSource, clone_command, clone_repository, is_supported_url};
pub use workspace::Workspace;

/// Where templates come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A directory on the local filesystem.
    #[default]
    Local,
    /// A directory inside a git repository.
    Git,
}

impl SourceKind {
    /// Lowercase name as used on the command line and in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Git => "git",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "git" => Ok(Self::Git),
            other => Err(SourceError::UnknownKind(other.to_owned())),
        }
    }
}

/// Source acquisition error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unknown source '{0}', expected 'local' or 'git'")]
    UnknownKind(String),

    #[error("repo_url is required when source is 'git'")]
    MissingRepoUrl,

    #[error("Unsupported repository URL '{0}', only http:// and https:// are allowed")]
    UnsupportedUrl(String),

    #[error("git executable is not available: {0}")]
    GitUnavailable(#[source] io::Error),

    #[error("Failed to clone repository {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("Input directory '{}' must be a relative path inside the repository", .0.display())]
    InvalidInputDir(PathBuf),

    #[error("Input directory '{}' not found in repository", .0.display())]
    InputDirMissing(PathBuf),

    #[error("Cannot create temporary workspace: {0}")]
    Workspace(#[source] io::Error),
}

/// Resolve the directory to process.
///
/// For [`SourceKind::Local`] `input_dir` is returned as given. For
/// [`SourceKind::Git`] the repository is cloned into `workspace` and
/// `input_dir` is resolved inside the clone.
pub fn resolve_input(
    kind: SourceKind,
    input_dir: &Path,
    git: Option<&GitSource>,
    workspace: &Workspace,
) -> Result<PathBuf, SourceError> {
    match kind {
        SourceKind::Local => Ok(input_dir.to_path_buf()),
        SourceKind::Git => {
            let git = git.ok_or(SourceError::MissingRepoUrl)?;
            checkout(git, input_dir, workspace)
        }
    }
}

/// Clone `git` into the workspace and return `input_dir` inside the clone.
pub fn checkout(
    git: &GitSource,
    input_dir: &Path,
    workspace: &Workspace,
) -> Result<PathBuf, SourceError> {
    let relative = relative_input(input_dir)?;
    let clone_dir = workspace.clone_dir();
    clone_repository(git, &clone_dir)?;
    locate_input(&clone_dir, relative)
}

/// Resolve `relative` inside `clone_dir`, following symlinks.
///
/// The canonical result must still lie inside the clone.
fn locate_input(clone_dir: &Path, relative: &Path) -> Result<PathBuf, SourceError> {
    let missing = || SourceError::InputDirMissing(relative.to_path_buf());
    let root = clone_dir.canonicalize().map_err(|_| missing())?;
    let resolved = clone_dir.join(relative).canonicalize().map_err(|_| missing())?;
    if !resolved.starts_with(&root) {
        return Err(SourceError::InvalidInputDir(relative.to_path_buf()));
    }
    if !resolved.is_dir() {
        return Err(missing());
    }
    tracing::debug!(path = %resolved.display(), "Resolved input directory in clone");
    Ok(resolved)
}

/// Validate that `input_dir` stays inside its parent.
///
/// Absolute paths and `..` components are rejected. `""` and `"."` mean the
/// repository root.
pub fn relative_input(input_dir: &Path) -> Result<&Path, SourceError> {
    let escapes = input_dir.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(SourceError::InvalidInputDir(input_dir.to_path_buf()));
    }
    Ok(input_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("local".parse::<SourceKind>().unwrap(), SourceKind::Local);
        assert_eq!("git".parse::<SourceKind>().unwrap(), SourceKind::Git);
        assert!(matches!(
            "svn".parse::<SourceKind>(),
            Err(SourceError::UnknownKind(kind)) if kind == "svn"
        ));
    }

    #[test]
    fn test_source_kind_display_round_trips() {
        for kind in [SourceKind::Local, SourceKind::Git] {
            assert_eq!(kind.to_string().parse::<SourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_source_kind_default_is_local() {
        assert_eq!(SourceKind::default(), SourceKind::Local);
    }

    #[test]
    fn test_relative_input_accepts_nested() {
        assert!(relative_input(Path::new("config/templates")).is_ok());
        assert!(relative_input(Path::new(".")).is_ok());
        assert!(relative_input(Path::new("")).is_ok());
    }

    #[test]
    fn test_relative_input_rejects_escapes() {
        assert!(matches!(
            relative_input(Path::new("../etc")),
            Err(SourceError::InvalidInputDir(_))
        ));
        assert!(matches!(
            relative_input(Path::new("a/../../b")),
            Err(SourceError::InvalidInputDir(_))
        ));
        assert!(matches!(
            relative_input(Path::new("/etc")),
            Err(SourceError::InvalidInputDir(_))
        ));
    }

    #[test]
    fn test_resolve_local_returns_path_as_is() {
        let workspace = Workspace::new().unwrap();
        let resolved =
            resolve_input(SourceKind::Local, Path::new("/some/dir"), None, &workspace).unwrap();
        assert_eq!(resolved, PathBuf::from("/some/dir"));
    }

    #[test]
    fn test_resolve_git_requires_repo() {
        let workspace = Workspace::new().unwrap();
        let err = resolve_input(SourceKind::Git, Path::new("conf"), None, &workspace).unwrap_err();
        assert!(matches!(err, SourceError::MissingRepoUrl));
    }

    #[test]
    fn test_checkout_rejects_escaping_input_before_cloning() {
        let workspace = Workspace::new().unwrap();
        let git = GitSource::new("https://example.invalid/repo.git", None).unwrap();
        let err = checkout(&git, Path::new("../outside"), &workspace).unwrap_err();
        assert!(matches!(err, SourceError::InvalidInputDir(_)));
        assert!(!workspace.clone_dir().exists());
    }

    #[test]
    fn test_locate_input_inside_clone() {
        let workspace = Workspace::new().unwrap();
        let clone = workspace.clone_dir();
        std::fs::create_dir_all(clone.join("conf/app")).unwrap();

        let resolved = locate_input(&clone, Path::new("conf/app")).unwrap();
        assert_eq!(resolved, clone.canonicalize().unwrap().join("conf/app"));
    }

    #[test]
    fn test_locate_input_missing_dir() {
        let workspace = Workspace::new().unwrap();
        let clone = workspace.clone_dir();
        std::fs::create_dir_all(&clone).unwrap();
        std::fs::write(clone.join("file.txt"), "").unwrap();

        assert!(matches!(
            locate_input(&clone, Path::new("nope")),
            Err(SourceError::InputDirMissing(_))
        ));
        assert!(matches!(
            locate_input(&clone, Path::new("file.txt")),
            Err(SourceError::InputDirMissing(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_input_rejects_symlink_out_of_clone() {
        let outside = tempfile::tempdir().unwrap();
        let workspace = Workspace::new().unwrap();
        let clone = workspace.clone_dir();
        std::fs::create_dir_all(&clone).unwrap();
        std::os::unix::fs::symlink(outside.path(), clone.join("conf")).unwrap();

        assert!(matches!(
            locate_input(&clone, Path::new("conf")),
            Err(SourceError::InvalidInputDir(_))
        ));
    }
}
