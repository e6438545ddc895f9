//! Upload processing endpoint.
//!
//! `POST /process-upload` accepts a multipart form:
//! - `files`: template files (repeatable); the filename may contain
//!   sub-directories, which are recreated in the output
//! - `config_files`: YAML data files (repeatable, optional), merged in order
//! - `data`: YAML or JSON text, used only when no `config_files` are sent
//!
//! The response is a zip archive of the processed tree.

use std::path::{Component, Path, PathBuf};

use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::response::Response;

use injecto_data::{DataSource, DataTree, load_and_merge};

use crate::archive;
use crate::error::ServerError;
use crate::job::{self, Output, UploadedFile};

/// Parsed multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    files: Vec<UploadedFile>,
    config_files: Vec<(String, String)>,
    data: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| ServerError::BadRequest(err.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);
            let content = field
                .bytes()
                .await
                .map_err(|err| ServerError::BadRequest(err.body_text()))?;

            match name.as_str() {
                "files" => {
                    let path = upload_path(file_name.as_deref().unwrap_or_default())?;
                    form.files.push(UploadedFile {
                        path,
                        content: content.to_vec(),
                    });
                }
                "config_files" => {
                    let source_name = file_name.unwrap_or_else(|| "config_files".to_owned());
                    let text = String::from_utf8(content.to_vec()).map_err(|_| {
                        ServerError::BadRequest(format!("Config file '{source_name}' is not valid UTF-8"))
                    })?;
                    form.config_files.push((source_name, text));
                }
                "data" => {
                    let text = String::from_utf8(content.to_vec()).map_err(|_| {
                        ServerError::BadRequest("data is not valid UTF-8".to_owned())
                    })?;
                    form.data = Some(text);
                }
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }
        Ok(form)
    }

    /// Merge the data values: config files if any, otherwise `data`.
    fn data_tree(&self) -> Result<DataTree, ServerError> {
        if self.config_files.is_empty() {
            let text = self.data.clone().unwrap_or_else(|| "{}".to_owned());
            load_and_merge(&[DataSource::inline("data", text)]).map_err(|source| {
                ServerError::Data {
                    context: "Invalid YAML/JSON data",
                    source,
                }
            })
        } else {
            let sources: Vec<_> = self
                .config_files
                .iter()
                .map(|(name, text)| DataSource::inline(name.clone(), text.clone()))
                .collect();
            load_and_merge(&sources).map_err(|source| ServerError::Data {
                context: "Error processing YAML config files",
                source,
            })
        }
    }
}

/// Validate an uploaded filename as a relative path with no `..` parts.
fn upload_path(file_name: &str) -> Result<PathBuf, ServerError> {
    let path = Path::new(file_name);
    let invalid = || ServerError::BadRequest(format!("Invalid upload filename '{file_name}'"));
    let relative = injecto_source::relative_input(path).map_err(|_| invalid())?;
    if !relative
        .components()
        .any(|component| matches!(component, Component::Normal(_)))
    {
        return Err(invalid());
    }
    Ok(relative.to_path_buf())
}

/// Handle POST /process-upload.
pub(crate) async fn process_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServerError> {
    let multipart = multipart.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    let form = UploadForm::read(multipart).await?;
    if form.files.is_empty() {
        return Err(ServerError::BadRequest(
            "At least one file is required in 'files'".to_owned(),
        ));
    }
    let data = form.data_tree()?;
    let files = form.files;

    let result = job::run_blocking(move || job::upload_job(&files, &data, Output::Archive)).await?;
    Ok(archive::zip_response(result.archive.unwrap_or_default()))
}
