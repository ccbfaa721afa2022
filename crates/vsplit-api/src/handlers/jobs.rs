//! Job submission and status handlers.

use std::path::{Path as FsPath, PathBuf};

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use vsplit_models::{
    Job, JobId, OutputFormat, QualityPreset, SplitConfig, DEFAULT_NAMING_PATTERN,
    DEFAULT_SEGMENT_SECS,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Request body for job submission.
#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    /// Staged file name (relative to the upload dir) or absolute path
    pub source: String,

    /// Maximum segment length in seconds
    #[serde(default = "default_max_length")]
    pub max_length_secs: u64,

    /// Quality preset
    #[serde(default)]
    pub quality: QualityPreset,

    /// Output container format
    #[serde(default)]
    pub format: OutputFormat,

    /// Naming pattern
    #[serde(default = "default_naming_pattern")]
    pub naming_pattern: String,

    /// Optional intro clip (staged name or absolute path)
    #[serde(default)]
    pub intro: Option<String>,

    /// Optional outro clip (staged name or absolute path)
    #[serde(default)]
    pub outro: Option<String>,

    /// FFmpeg thread count
    #[serde(default = "default_threads")]
    pub threads: u32,
}

fn default_max_length() -> u64 {
    DEFAULT_SEGMENT_SECS
}
fn default_naming_pattern() -> String {
    DEFAULT_NAMING_PATTERN.to_string()
}
fn default_threads() -> u32 {
    4
}

/// Response for job submission.
#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
    pub status: String,
}

/// Job status response.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    /// queued, processing, completed or failed
    pub status: String,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Human-readable status message
    pub message: String,
    pub segments_completed: u32,
    pub segments_total: u32,
    /// Produced output file names, in segment order
    pub output_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub updated_at: String,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            status: job.status.as_str().to_string(),
            progress: job.progress,
            message: job.message,
            segments_completed: job.segments_completed,
            segments_total: job.segments_total,
            output_files: job.output_files,
            error: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            started_at: job.started_at.map(|t| t.to_rfc3339()),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the job list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    /// Maximum number of jobs to return (most recent first dropped)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Job list response.
#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub jobs: Vec<JobStatusResponse>,
}

/// Cancellation response.
#[derive(Debug, Serialize)]
pub struct CancelJobResponse {
    pub job_id: String,
    /// Whether the cancellation flag was delivered to a running job
    pub cancelling: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/jobs
///
/// Submit a splitting job. The source is validated, probed and planned
/// before the job is created; any structural problem is reported here and
/// no job record exists afterwards.
///
/// Returns:
/// - 200: Job id, processing started in the background
/// - 400: Invalid configuration, unreadable source, no video stream
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> ApiResult<Json<SubmitJobResponse>> {
    let source_path = resolve_staged_path(&state, &request.source)?;
    let intro_path = request
        .intro
        .as_deref()
        .map(|p| resolve_staged_path(&state, p))
        .transpose()?;
    let outro_path = request
        .outro
        .as_deref()
        .map(|p| resolve_staged_path(&state, p))
        .transpose()?;

    // Each job gets its own output directory under the configured root.
    let output_dir = state
        .config
        .output_dir
        .join(Uuid::new_v4().simple().to_string());

    let config = SplitConfig {
        source_path,
        output_dir,
        max_segment_secs: request.max_length_secs,
        output_format: request.format,
        naming_pattern: request.naming_pattern,
        quality: request.quality,
        intro_path,
        outro_path,
        threads: request.threads,
    };

    let job_id = state.orchestrator.submit(config).await?;
    info!("Job {} submitted", job_id);

    Ok(Json(SubmitJobResponse {
        job_id: job_id.to_string(),
        status: "queued".to_string(),
    }))
}

/// GET /api/jobs/:job_id
///
/// Get the current status of a job.
///
/// Returns:
/// - 200: Job snapshot (status, progress, message, outputs)
/// - 404: Unknown job id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = state
        .orchestrator
        .status(&JobId::from_string(job_id))
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(job.into()))
}

/// GET /api/jobs
///
/// List known jobs, newest last. `limit` keeps only the most recent N
/// (default 20).
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<Json<ListJobsResponse>> {
    let limit = query.limit.unwrap_or(20);
    let all = state.orchestrator.list();
    let skip = all.len().saturating_sub(limit);

    Ok(Json(ListJobsResponse {
        jobs: all.into_iter().skip(skip).map(Into::into).collect(),
    }))
}

/// POST /api/jobs/:job_id/cancel
///
/// Request cooperative cancellation. The flag is honored between segments;
/// an in-flight engine invocation finishes first.
///
/// Returns:
/// - 200: Cancellation flag state
/// - 404: Unknown job id
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<CancelJobResponse>> {
    let id = JobId::from_string(job_id);
    if state.orchestrator.status(&id).is_none() {
        return Err(ApiError::not_found("Job not found"));
    }

    let cancelling = state.orchestrator.cancel(&id);
    info!("Job {} cancellation requested (delivered: {})", id, cancelling);

    Ok(Json(CancelJobResponse {
        job_id: id.to_string(),
        cancelling,
    }))
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve a submitted source/intro/outro reference against the staging
/// directory. Absolute paths pass through; relative names must stay inside
/// the staging dir.
fn resolve_staged_path(state: &AppState, reference: &str) -> Result<PathBuf, ApiError> {
    if reference.is_empty() {
        return Err(ApiError::bad_request("Empty file reference"));
    }

    let path = FsPath::new(reference);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    if reference.contains("..") {
        return Err(ApiError::bad_request("Invalid file reference"));
    }
    Ok(state.config.upload_dir.join(reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use std::sync::Arc;
    use vsplit_media::FfmpegEngine;

    fn test_state() -> AppState {
        // The engine is never invoked by path resolution.
        AppState::with_engine(ApiConfig::default(), Arc::new(FfmpegEngine))
    }

    #[test]
    fn test_relative_references_resolve_into_staging() {
        let state = test_state();
        let path = resolve_staged_path(&state, "stream.mp4").unwrap();
        assert_eq!(path, state.config.upload_dir.join("stream.mp4"));
    }

    #[test]
    fn test_absolute_references_pass_through() {
        let state = test_state();
        let path = resolve_staged_path(&state, "/data/stream.mp4").unwrap();
        assert_eq!(path, PathBuf::from("/data/stream.mp4"));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let state = test_state();
        assert!(resolve_staged_path(&state, "../etc/passwd").is_err());
        assert!(resolve_staged_path(&state, "").is_err());
    }

    #[test]
    fn test_submit_request_defaults() {
        let request: SubmitJobRequest =
            serde_json::from_str(r#"{"source": "stream.mp4"}"#).unwrap();
        assert_eq!(request.max_length_secs, 1200);
        assert_eq!(request.quality, QualityPreset::High);
        assert_eq!(request.format, OutputFormat::Mp4);
        assert_eq!(request.naming_pattern, DEFAULT_NAMING_PATTERN);
        assert_eq!(request.threads, 4);
        assert!(request.intro.is_none());
    }
}
