//! `injecto process` command implementation.

use std::path::PathBuf;

use clap::Args;
use injecto_config::{CliSettings, Config, ProcessConfig};
use injecto_data::{DataSource, load_and_merge};
use injecto_fs::{ProcessReport, process_files};
use injecto_source::{SourceKind, Workspace};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Path to configuration file (default: auto-discover injecto.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source of the files to process: `local` or `git`.
    #[arg(short, long)]
    source: Option<SourceKind>,

    /// Git repository URL in HTTPS format (required if source is `git`).
    #[arg(short, long)]
    repo_url: Option<String>,

    /// Branch to clone (defaults to the repository's default branch).
    #[arg(short, long)]
    branch: Option<String>,

    /// Directory containing the files to process (inside the repository for git).
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Directory for processed files. Defaults to the input directory (in-place editing).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// YAML data files. Values from later files override earlier ones.
    #[arg(short, long = "data-files", value_name = "DATA_FILE", num_args = 1..)]
    data_files: Vec<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl ProcessArgs {
    /// Execute the process command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the repository cannot be
    /// cloned, data files cannot be loaded, or the input directory is missing.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        output.banner();

        let debug = self.debug;
        let config_path = self.config.clone();
        let cli_settings = self.into_cli_settings();
        let config = Config::load(config_path.as_deref(), Some(&cli_settings))?;
        let process = config.require_process()?;

        if process.in_place {
            output.warning("Output directory not specified. Will perform edits in-place.");
        }
        print_settings(&output, &process, debug);

        let workspace = match process.source {
            SourceKind::Git => Some(Workspace::new()?),
            SourceKind::Local => None,
        };
        let result = run(&output, &process, workspace.as_ref());

        if let Some(workspace) = workspace {
            output.section_header("Cleaning up temporary files");
            workspace.close();
            output.success("Temporary files cleaned up.");
        }

        let report = result?;
        output.separator();
        output.success(&format!("File processing finished. {}.", report.summary()));
        if !report.failures.is_empty() {
            output.warning(&format!(
                "{} of {} files could not be processed:",
                report.failures.len(),
                report.failures.len() + report.files_processed()
            ));
            for failure in &report.failures {
                output.warning(&format!("  - {failure}"));
            }
        }
        Ok(())
    }

    /// Build config overrides from the arguments.
    fn into_cli_settings(self) -> CliSettings {
        CliSettings {
            input_dir: self.input_dir,
            output_dir: self.output_dir,
            data_files: (!self.data_files.is_empty()).then_some(self.data_files),
            source: self.source,
            repo_url: self.repo_url,
            branch: self.branch,
            ..CliSettings::default()
        }
    }
}

/// Clone if needed, merge data, process files.
fn run(
    output: &Output,
    process: &ProcessConfig,
    workspace: Option<&Workspace>,
) -> Result<ProcessReport, CliError> {
    let input_dir = match workspace {
        Some(workspace) => {
            output.section_header("Cloning Git Repository");
            injecto_source::resolve_input(
                process.source,
                &process.input_dir,
                process.git.as_ref(),
                workspace,
            )?
        }
        None => process.input_dir.clone(),
    };

    output.section_header("Data files merging");
    let sources: Vec<_> = process.data_files.iter().map(DataSource::file).collect();
    let data = load_and_merge(&sources)?;

    output.section_header("File processing");
    Ok(process_files(&input_dir, &process.output_dir, &data)?)
}

fn print_settings(output: &Output, process: &ProcessConfig, debug: bool) {
    output.info(&format!("  Source: {}", process.source));
    if let Some(git) = &process.git {
        output.info(&format!("  Repository URL: {}", git.url()));
        if let Some(branch) = git.branch() {
            output.info(&format!("  Branch: {branch}"));
        }
    }
    output.info(&format!("  Input directory: {}", process.input_dir.display()));
    output.info(&format!("  Output directory: {}", process.output_dir.display()));
    output.info("  Data files:");
    for file in &process.data_files {
        output.info(&format!("    - {}", file.display()));
    }
    output.info(&format!(
        "  Debug mode: {}",
        if debug { "Enabled" } else { "Disabled" }
    ));
    output.separator();
}
