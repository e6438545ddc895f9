//! Zip archives of processed output trees.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ServerError;

/// Name of the downloaded archive.
const ARCHIVE_NAME: &str = "processed_files.zip";

/// Pack every file under `dir` into an in-memory zip archive.
///
/// Entry names are relative to `dir` and always use `/` separators.
pub(crate) fn zip_directory(dir: &Path) -> Result<Vec<u8>, ServerError> {
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for relative in injecto_fs::discover_files(dir) {
        let name = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = fs::read(dir.join(&relative))?;
        zip.start_file(name, options)?;
        zip.write_all(&content)?;
    }

    Ok(zip.finish()?.into_inner())
}

/// Wrap archive bytes in a download response.
pub(crate) fn zip_response(bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={ARCHIVE_NAME}"),
            ),
        ],
        bytes,
    )
        .into_response()
}
