//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use injecto_data::DataError;
use injecto_fs::ProcessError;
use injecto_source::SourceError;

/// Server error type.
///
/// Every variant renders as `{"error": "..."}` with a 4xx or 5xx status.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed or inconsistent request.
    #[error("{0}")]
    BadRequest(String),

    /// Data values could not be loaded.
    #[error("{context}: {source}")]
    Data {
        /// What was being loaded.
        context: &'static str,
        #[source]
        source: DataError,
    },

    /// Repository checkout or workspace failure.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Fatal processing failure.
    #[error("Processing failed: {0}")]
    Process(#[from] ProcessError),

    /// Archive creation failure.
    #[error("Failed to create archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The background job panicked or was cancelled.
    #[error("Processing job failed: {0}")]
    Job(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// HTTP status for this error.
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Data { .. } => StatusCode::BAD_REQUEST,
            Self::Source(SourceError::GitUnavailable(_) | SourceError::Workspace(_))
            | Self::Process(_)
            | Self::Archive(_)
            | Self::Io(_)
            | Self::Job(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Source(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}
