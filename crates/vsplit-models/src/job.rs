//! Job records for progress tracking and polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued waiting for the processing loop
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A splitting job as seen by status pollers.
///
/// Owned by the job store; readers only ever receive a cloned snapshot,
/// so a poller can never observe a half-updated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,
    /// Current status
    pub status: JobStatus,
    /// Progress percentage (0-100, non-decreasing while processing)
    pub progress: u8,
    /// Human-readable status message
    pub message: String,
    /// Source file being split
    pub source_path: PathBuf,
    /// Directory the outputs are written to
    pub output_dir: PathBuf,
    /// Number of segments produced so far
    pub segments_completed: u32,
    /// Total number of segments planned
    pub segments_total: u32,
    /// File names of produced outputs, in segment order
    pub output_files: Vec<String>,
    /// Error detail, set only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When processing started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(source_path: PathBuf, output_dir: PathBuf, segments_total: u32) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Queued,
            progress: 0,
            message: format!("Queued: {} segments planned", segments_total),
            source_path,
            output_dir,
            segments_completed: 0,
            segments_total,
            output_files: Vec::new(),
            error_message: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Transition to processing.
    pub fn start(&mut self) {
        self.status = JobStatus::Processing;
        self.message = "Processing".to_string();
        self.started_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Record one finished segment and recompute progress.
    pub fn record_segment(&mut self, file_name: impl Into<String>) {
        self.segments_completed += 1;
        self.output_files.push(file_name.into());
        if self.segments_total > 0 {
            let pct = (100.0 * self.segments_completed as f64 / self.segments_total as f64).round();
            // Progress never moves backwards while processing.
            self.progress = self.progress.max(pct as u8).min(100);
        }
        self.message = format!(
            "Segment {} of {} complete",
            self.segments_completed, self.segments_total
        );
        self.updated_at = Utc::now();
    }

    /// Mark job as completed.
    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.message = format!("Created {} segments", self.output_files.len());
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Mark job as failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.status = JobStatus::Failed;
        self.message = format!("Failed: {}", error);
        self.error_message = Some(error);
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_job(total: u32) -> Job {
        Job::new(PathBuf::from("/in/stream.mp4"), PathBuf::from("/out"), total)
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = test_job(3);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(!job.is_terminal());
        assert!(job.output_files.is_empty());
    }

    #[test]
    fn test_progress_tracks_completed_segments() {
        let mut job = test_job(3);
        job.start();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.started_at.is_some());

        job.record_segment("part01.mp4");
        assert_eq!(job.progress, 33);
        job.record_segment("part02.mp4");
        assert_eq!(job.progress, 67);
        job.record_segment("part03.mp4");
        assert_eq!(job.progress, 100);
        assert_eq!(job.output_files.len(), 3);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut job = test_job(1);
        job.start();
        job.record_segment("part01.mp4");
        job.complete();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.is_terminal());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_failure_keeps_prior_progress_and_outputs() {
        let mut job = test_job(3);
        job.start();
        job.record_segment("part01.mp4");
        job.record_segment("part02.mp4");
        let progress_before = job.progress;

        job.fail("encoder exited with status 1");
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.progress, progress_before);
        assert_eq!(job.output_files.len(), 2);
        assert!(job.error_message.as_deref().unwrap().contains("status 1"));
        assert!(job.is_terminal());
    }
}
