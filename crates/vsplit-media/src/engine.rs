//! The media engine capability interface.
//!
//! The orchestrator drives an external engine through this trait so the
//! dependency is injectable: production uses `FfmpegEngine`, tests use a
//! fake returning canned metadata and outputs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use vsplit_models::{EncodingConfig, SegmentRange};

use crate::command::{check_ffmpeg, check_ffprobe};
use crate::concat::concatenate;
use crate::error::MediaResult;
use crate::extract::extract_segment;
use crate::probe::{probe_source, SourceMetadata};

/// Capabilities of the external media engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Inspect a file and return its structural metadata.
    async fn probe(&self, path: &Path) -> MediaResult<SourceMetadata>;

    /// Extract one time range from `input` into `output`.
    async fn extract(
        &self,
        input: &Path,
        output: &Path,
        range: &SegmentRange,
        encoding: &EncodingConfig,
    ) -> MediaResult<()>;

    /// Concatenate parts into `output`, re-encoding only when required.
    async fn concatenate(
        &self,
        parts: &[PathBuf],
        output: &Path,
        encoding: &EncodingConfig,
    ) -> MediaResult<()>;
}

/// FFmpeg-backed engine.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine;

impl FfmpegEngine {
    /// Create the engine, verifying both binaries are reachable.
    ///
    /// The check is a direct executable lookup; attempting a dummy probe
    /// instead produces misleading failures. A missing binary here is
    /// environment-fatal and should stop the process, not individual jobs.
    pub fn new() -> MediaResult<Self> {
        check_ffmpeg()?;
        check_ffprobe()?;
        Ok(Self)
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn probe(&self, path: &Path) -> MediaResult<SourceMetadata> {
        probe_source(path).await
    }

    async fn extract(
        &self,
        input: &Path,
        output: &Path,
        range: &SegmentRange,
        encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        extract_segment(input, output, range, encoding).await
    }

    async fn concatenate(
        &self,
        parts: &[PathBuf],
        output: &Path,
        encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        concatenate(parts, output, encoding).await
    }
}
