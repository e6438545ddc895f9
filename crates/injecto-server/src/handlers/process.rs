//! Git processing endpoints.
//!
//! `POST /process` returns a JSON summary, `POST /process-git-download`
//! returns the processed tree as a zip archive. Both clone the requested
//! repository into a scratch workspace that is removed afterwards.

use std::path::PathBuf;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use injecto_data::DataTree;
use injecto_fs::ProcessReport;
use injecto_source::{GitSource, SourceKind};

use crate::archive;
use crate::error::ServerError;
use crate::job::{self, Output};

/// Request body for the git endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ProcessRequest {
    /// `local` or `git`.
    #[serde(default)]
    source: SourceKind,
    repo_url: Option<String>,
    branch: Option<String>,
    /// Directory inside the repository.
    input_dir: String,
    /// Data values, used as the only data source.
    data: serde_json::Map<String, serde_json::Value>,
}

impl ProcessRequest {
    fn git_source(&self) -> Result<GitSource, ServerError> {
        let repo_url = self.repo_url.as_deref().ok_or_else(|| {
            ServerError::BadRequest("repo_url is required when source is 'git'".to_owned())
        })?;
        Ok(GitSource::new(repo_url, self.branch.clone())?)
    }

    fn data_tree(&self) -> Result<DataTree, ServerError> {
        json_to_tree(&self.data)
    }
}

/// Convert a JSON object into a data tree.
pub(crate) fn json_to_tree(
    data: &serde_json::Map<String, serde_json::Value>,
) -> Result<DataTree, ServerError> {
    match serde_yaml::to_value(data) {
        Ok(serde_yaml::Value::Mapping(mapping)) => Ok(DataTree::from_mapping(mapping)),
        Ok(_) => Err(ServerError::BadRequest(
            "data must be an object".to_owned(),
        )),
        Err(err) => Err(ServerError::BadRequest(format!("Invalid data: {err}"))),
    }
}

/// Response for POST /process.
#[derive(Debug, Serialize)]
pub(crate) struct ProcessResponse {
    status: &'static str,
    message: String,
    files_processed: usize,
    files_modified: usize,
    replacements: usize,
    section_toggles: usize,
    /// Files that could not be processed.
    errors: Vec<String>,
    /// Directives that could not be applied, prefixed with their file.
    warnings: Vec<String>,
}

impl ProcessResponse {
    pub(crate) fn from_report(report: &ProcessReport) -> Self {
        let warnings = report
            .files
            .iter()
            .flat_map(|file| {
                file.warnings
                    .iter()
                    .map(move |warning| format!("{}: {warning}", file.path.display()))
            })
            .collect();
        Self {
            status: "success",
            message: "Configuration files processed successfully".to_owned(),
            files_processed: report.files_processed(),
            files_modified: report.counters.files_modified,
            replacements: report.counters.replacements,
            section_toggles: report.counters.section_toggles,
            errors: report.failures.iter().map(ToString::to_string).collect(),
            warnings,
        }
    }
}

fn parse(payload: Result<Json<ProcessRequest>, JsonRejection>) -> Result<ProcessRequest, ServerError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}

/// Handle POST /process.
pub(crate) async fn process(
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ServerError> {
    let request = parse(payload)?;
    if request.source == SourceKind::Local {
        return Err(ServerError::BadRequest(
            "Local source requires file upload endpoint".to_owned(),
        ));
    }
    let git = request.git_source()?;
    let data = request.data_tree()?;
    let input_dir = PathBuf::from(request.input_dir);

    let result =
        job::run_blocking(move || job::git_job(&git, &input_dir, &data, Output::Summary)).await?;
    Ok(Json(ProcessResponse::from_report(&result.report)))
}

/// Handle POST /process-git-download.
pub(crate) async fn process_git_download(
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let request = parse(payload)?;
    if request.source != SourceKind::Git || request.repo_url.is_none() {
        return Err(ServerError::BadRequest(
            "This endpoint requires git source with repo_url".to_owned(),
        ));
    }
    let git = request.git_source()?;
    let data = request.data_tree()?;
    let input_dir = PathBuf::from(request.input_dir);

    let result =
        job::run_blocking(move || job::git_job(&git, &input_dir, &data, Output::Archive)).await?;
    Ok(archive::zip_response(result.archive.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::handlers::test_support::{body_json, router};

    async fn post(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        post_raw(uri, body.to_string()).await
    }

    async fn post_raw(uri: &str, body: String) -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    // ── /process ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_process_local_source_rejected() {
        let (status, body) = post(
            "/process",
            json!({"source": "local", "input_dir": "conf", "data": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Local source requires file upload endpoint");
    }

    #[tokio::test]
    async fn test_process_source_defaults_to_local() {
        let (status, _) = post("/process", json!({"input_dir": "conf", "data": {}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_process_git_requires_repo_url() {
        let (status, body) = post(
            "/process",
            json!({"source": "git", "input_dir": "conf", "data": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "repo_url is required when source is 'git'");
    }

    #[tokio::test]
    async fn test_process_git_rejects_unsupported_url() {
        let (status, body) = post(
            "/process",
            json!({
                "source": "git",
                "repo_url": "file:///etc",
                "input_dir": "conf",
                "data": {}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unsupported repository URL"));
    }

    #[tokio::test]
    async fn test_process_rejects_escaping_input_dir() {
        let (status, body) = post(
            "/process",
            json!({
                "source": "git",
                "repo_url": "https://example.invalid/repo.git",
                "input_dir": "../../etc",
                "data": {}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("relative path"));
    }

    #[tokio::test]
    async fn test_process_invalid_json() {
        let (status, body) = post_raw("/process", "{not json".to_owned()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_process_missing_field() {
        let (status, body) = post("/process", json!({"source": "git", "data": {}})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("input_dir"));
    }

    #[tokio::test]
    async fn test_process_unknown_source() {
        let (status, _) = post(
            "/process",
            json!({"source": "svn", "input_dir": "conf", "data": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── /process-git-download ────────────────────────────────────────

    #[tokio::test]
    async fn test_git_download_requires_git_source() {
        let (status, body) = post(
            "/process-git-download",
            json!({
                "source": "local",
                "repo_url": "https://h/r.git",
                "input_dir": "conf",
                "data": {}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "This endpoint requires git source with repo_url");
    }

    #[tokio::test]
    async fn test_git_download_requires_repo_url() {
        let (status, _) = post(
            "/process-git-download",
            json!({"source": "git", "input_dir": "conf", "data": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_json_to_tree_keeps_nesting() {
        let data = json!({"db": {"port": 5432, "hosts": ["a", "b"]}, "debug": false});
        let tree = json_to_tree(data.as_object().unwrap()).unwrap();
        assert_eq!(
            tree.resolve("db.port"),
            Some(&serde_yaml::Value::from(5432))
        );
        assert_eq!(tree.resolve("debug"), Some(&serde_yaml::Value::Bool(false)));
    }

    #[test]
    fn test_response_from_report() {
        let report = ProcessReport::default();
        let json = serde_json::to_value(ProcessResponse::from_report(&report)).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "success",
                "message": "Configuration files processed successfully",
                "files_processed": 0,
                "files_modified": 0,
                "replacements": 0,
                "section_toggles": 0,
                "errors": [],
                "warnings": []
            })
        );
    }
}
