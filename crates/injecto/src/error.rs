//! CLI error types.

use injecto_config::ConfigError;
use injecto_data::DataError;
use injecto_fs::ProcessError;
use injecto_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Data(#[from] DataError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("{0}")]
    Server(String),
}
