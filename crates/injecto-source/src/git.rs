//! Shallow clones through the `git` executable.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::SourceError;

/// A repository to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    url: String,
    branch: Option<String>,
}

impl GitSource {
    /// Validate `url` and build a source.
    ///
    /// An empty branch is treated as "use the default branch".
    pub fn new(url: impl Into<String>, branch: Option<String>) -> Result<Self, SourceError> {
        let url = url.into();
        if !is_supported_url(&url) {
            return Err(SourceError::UnsupportedUrl(url));
        }
        let branch = branch.filter(|branch| !branch.trim().is_empty());
        Ok(Self { url, branch })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

/// Whether `url` uses a scheme accepted for cloning.
#[must_use]
pub fn is_supported_url(url: &str) -> bool {
    ["https://", "http://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()))
}

/// Build `git clone --depth 1 [--branch B] URL DEST`.
#[must_use]
pub fn clone_command(git: &GitSource, dest: &Path) -> Command {
    let mut command = Command::new("git");
    command.args(["clone", "--depth", "1"]);
    if let Some(branch) = git.branch() {
        command.args(["--branch", branch]);
    }
    command.arg(git.url()).arg(dest);
    command.env("GIT_TERMINAL_PROMPT", "0");
    command
}

/// Shallow-clone `git` into `dest`.
pub fn clone_repository(git: &GitSource, dest: &Path) -> Result<(), SourceError> {
    tracing::info!(url = git.url(), branch = git.branch(), dest = %dest.display(), "Cloning repository");

    let output = clone_command(git, dest).output().map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            SourceError::GitUnavailable(err)
        } else {
            SourceError::CloneFailed {
                url: git.url().to_owned(),
                stderr: err.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        tracing::error!(url = git.url(), %stderr, "git clone failed");
        return Err(SourceError::CloneFailed {
            url: git.url().to_owned(),
            stderr,
        });
    }

    tracing::info!(url = git.url(), "Repository cloned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn args(command: &Command) -> Vec<&OsStr> {
        command.get_args().collect()
    }

    #[test]
    fn test_supported_urls() {
        assert!(is_supported_url("https://github.com/org/repo.git"));
        assert!(is_supported_url("http://git.local/repo"));
        assert!(!is_supported_url("git@github.com:org/repo.git"));
        assert!(!is_supported_url("file:///tmp/repo"));
        assert!(!is_supported_url("https://"));
        assert!(!is_supported_url(""));
    }

    #[test]
    fn test_new_rejects_ssh_url() {
        let err = GitSource::new("git@github.com:org/repo.git", None).unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedUrl(_)));
    }

    #[test]
    fn test_new_drops_blank_branch() {
        let git = GitSource::new("https://h/r.git", Some("  ".to_owned())).unwrap();
        assert_eq!(git.branch(), None);
    }

    #[test]
    fn test_clone_command_default_branch() {
        let git = GitSource::new("https://h/r.git", None).unwrap();
        let command = clone_command(&git, Path::new("/tmp/dest"));
        assert_eq!(command.get_program(), "git");
        assert_eq!(
            args(&command),
            ["clone", "--depth", "1", "https://h/r.git", "/tmp/dest"]
        );
    }

    #[test]
    fn test_clone_command_with_branch() {
        let git = GitSource::new("https://h/r.git", Some("release".to_owned())).unwrap();
        let command = clone_command(&git, Path::new("dest"));
        assert_eq!(
            args(&command),
            ["clone", "--depth", "1", "--branch", "release", "https://h/r.git", "dest"]
        );
    }
}
