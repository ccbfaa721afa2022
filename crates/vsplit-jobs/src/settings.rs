//! Orchestrator runtime settings.

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Maximum number of jobs retained for listing
    pub max_retained_jobs: usize,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            max_retained_jobs: 50,
        }
    }
}

impl JobSettings {
    /// Create settings from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_retained_jobs: std::env::var("JOBS_MAX_RETAINED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
        }
    }
}
