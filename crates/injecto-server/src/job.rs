//! Processing jobs.
//!
//! A job owns a fresh [`Workspace`], fills its input (git clone or uploaded
//! files), runs [`injecto_fs::process_files`] and optionally archives the
//! output. Jobs do blocking filesystem and process I/O, so handlers run them
//! through [`run_blocking`].

use std::fs;
use std::path::{Path, PathBuf};

use injecto_data::DataTree;
use injecto_fs::ProcessReport;
use injecto_source::{GitSource, Workspace};

use crate::archive;
use crate::error::ServerError;

/// What to do with the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Output {
    /// Only report counters.
    Summary,
    /// Report counters and return the output tree as a zip archive.
    Archive,
}

/// Result of a finished job.
#[derive(Debug)]
pub(crate) struct JobResult {
    pub(crate) report: ProcessReport,
    pub(crate) archive: Option<Vec<u8>>,
}

/// A file received in an upload.
#[derive(Debug)]
pub(crate) struct UploadedFile {
    /// Sanitized path relative to the input root.
    pub(crate) path: PathBuf,
    pub(crate) content: Vec<u8>,
}

/// Clone `git`, process `input_dir` inside it.
pub(crate) fn git_job(
    git: &GitSource,
    input_dir: &Path,
    data: &DataTree,
    output: Output,
) -> Result<JobResult, ServerError> {
    let workspace = Workspace::new()?;
    let input = injecto_source::checkout(git, input_dir, &workspace)?;
    finish(&workspace, &input, data, output)
}

/// Write uploaded files into a workspace and process them.
pub(crate) fn upload_job(
    files: &[UploadedFile],
    data: &DataTree,
    output: Output,
) -> Result<JobResult, ServerError> {
    let workspace = Workspace::new()?;
    let input = workspace.input_dir();
    for file in files {
        let target = input.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.content)?;
    }
    tracing::debug!(count = files.len(), "Saved uploaded files");
    finish(&workspace, &input, data, output)
}

fn finish(
    workspace: &Workspace,
    input: &Path,
    data: &DataTree,
    output: Output,
) -> Result<JobResult, ServerError> {
    let output_dir = workspace.output_dir();
    let report = injecto_fs::process_files(input, &output_dir, data)?;
    let archive = match output {
        Output::Summary => None,
        Output::Archive => Some(archive::zip_directory(&output_dir)?),
    };
    Ok(JobResult { report, archive })
}

/// Run a blocking job on the blocking thread pool.
pub(crate) async fn run_blocking<F>(job: F) -> Result<JobResult, ServerError>
where
    F: FnOnce() -> Result<JobResult, ServerError> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await?
}
