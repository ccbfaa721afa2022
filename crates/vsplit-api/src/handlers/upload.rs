//! Source upload handler.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use vsplit_models::OutputFormat;

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_upload_bytes;
use crate::state::AppState;

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Staged file name, usable as a submit request's `source`
    pub filename: String,
    /// Full staged path on the server
    pub path: String,
    /// Received size in bytes
    pub size: u64,
}

/// POST /api/upload
///
/// Accept a multipart source upload and stage it for splitting. The body
/// size cap is enforced by the router's request body limit; anything larger
/// is rejected before reaching this handler.
///
/// Returns:
/// - 200: Staged file name, path and size
/// - 400: No file field, or unsupported container format
pub async fn upload_source(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        // Strip any client-supplied directory components.
        let file_name = Path::new(&original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::bad_request("Invalid upload file name"))?
            .to_string();

        if !OutputFormat::is_supported_source(Path::new(&file_name)) {
            return Err(ApiError::bad_request(format!(
                "Unsupported file format: {}",
                file_name
            )));
        }

        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create staging dir: {}", e)))?;

        let dest = state.config.upload_dir.join(&file_name);
        let size = stream_to_file(&dest, field).await?;
        record_upload_bytes(size);

        info!("Staged upload {} ({} bytes)", dest.display(), size);

        return Ok(Json(UploadResponse {
            filename: file_name,
            path: dest.display().to_string(),
            size,
        }));
    }

    Err(ApiError::bad_request("No file field in upload"))
}

/// Stream a multipart field to disk in chunks.
///
/// A partial file is removed when the write fails; uploads are staged
/// whole or not at all.
async fn stream_to_file(path: &PathBuf, mut field: Field<'_>) -> Result<u64, ApiError> {
    let result: Result<u64, ApiError> = async {
        let file = File::create(path)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to create staged file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        let mut size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(format!("Upload interrupted: {}", e)))?
        {
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;
            size += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to flush upload: {}", e)))?;
        Ok(size)
    }
    .await;

    if result.is_err() && path.exists() {
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}
