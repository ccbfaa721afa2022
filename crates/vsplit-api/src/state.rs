//! Application state.

use std::sync::Arc;

use vsplit_jobs::{JobSettings, Orchestrator};
use vsplit_media::{FfmpegEngine, MediaEngine, MediaResult};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create application state backed by the FFmpeg engine.
    ///
    /// Fails when ffmpeg/ffprobe are unreachable; that is environment-fatal
    /// and the caller should exit rather than serve requests.
    pub fn new(config: ApiConfig) -> MediaResult<Self> {
        let engine = Arc::new(FfmpegEngine::new()?);
        Ok(Self::with_engine(config, engine))
    }

    /// Create application state with an injected engine (used by tests).
    pub fn with_engine(config: ApiConfig, engine: Arc<dyn MediaEngine>) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(engine, JobSettings::from_env()));
        Self {
            config,
            orchestrator,
        }
    }
}
