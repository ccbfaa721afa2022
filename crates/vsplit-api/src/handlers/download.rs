//! Output download handler.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use vsplit_models::JobId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/jobs/:job_id/files/:file_name
///
/// Stream one produced output as a download. The file name must be one of
/// the job's recorded outputs; anything else (including traversal attempts)
/// is rejected, so the endpoint can never disclose arbitrary files.
///
/// Returns:
/// - 200: File bytes with attachment disposition
/// - 400: Unsafe file name
/// - 404: Unknown job, name not recorded for the job, or file missing
pub async fn download_output(
    State(state): State<AppState>,
    Path((job_id, file_name)): Path<(String, String)>,
) -> ApiResult<Response> {
    if !is_safe_file_name(&file_name) {
        return Err(ApiError::bad_request("Invalid file name"));
    }

    let job = state
        .orchestrator
        .status(&JobId::from_string(job_id))
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if !job.output_files.iter().any(|f| f == &file_name) {
        return Err(ApiError::not_found("File is not an output of this job"));
    }

    let path = job.output_dir.join(&file_name);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("File not found on disk"))?;
    let content_length = file
        .metadata()
        .await
        .map(|m| m.len())
        .map_err(|e| ApiError::internal(format!("Failed to stat output: {}", e)))?;

    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&file_name))
        .header(header::CONTENT_LENGTH, content_length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}

/// Reject names that could escape the job's output directory.
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

/// Content type by output extension.
fn content_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".mp4") || lower.ends_with(".mov") {
        "video/mp4"
    } else if lower.ends_with(".mkv") {
        "video/x-matroska"
    } else if lower.ends_with(".webm") {
        "video/webm"
    } else if lower.ends_with(".avi") {
        "video/x-msvideo"
    } else if lower.ends_with(".flv") {
        "video/x-flv"
    } else if lower.ends_with(".ts") {
        "video/mp2t"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_names() {
        assert!(is_safe_file_name("stream_part01_20250115.mp4"));
        assert!(!is_safe_file_name(""));
        assert!(!is_safe_file_name("../secrets"));
        assert!(!is_safe_file_name("a/b.mp4"));
        assert!(!is_safe_file_name("a\\b.mp4"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("A.MKV"), "video/x-matroska");
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.ts"), "video/mp2t");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
