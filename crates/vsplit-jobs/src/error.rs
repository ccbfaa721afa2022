//! Job orchestration error types.

use thiserror::Error;

use vsplit_media::MediaError;
use vsplit_models::{ConfigError, NamingError, PlanError};

pub type JobResult<T> = Result<T, JobError>;

/// Errors surfaced by `submit` before a job ever enters processing.
///
/// Execution-time failures never appear here: they terminate the affected
/// job only and are retained on its record for pollers.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Media engine error: {0}")]
    Media(#[from] MediaError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    /// Whether this error means the external engine is unreachable.
    ///
    /// Treated as environment-fatal for the whole process rather than a
    /// per-job condition.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, JobError::Media(e) if e.is_tool_missing())
    }
}
