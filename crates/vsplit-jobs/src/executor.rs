//! Segment executor.
//!
//! Produces one final output file per planned segment:
//!
//! 1. Extract `[start, end)` from the source into a temp file, applying the
//!    quality preset's encoder parameters.
//! 2. If an intro and/or outro is configured, concatenate
//!    intro + segment + outro into the final output (stream copy when the
//!    parts match, automatic re-encode fallback otherwise); without
//!    attachments the temp file is moved into place.
//! 3. Verify the output exists and its reported duration is within
//!    tolerance of the expected length.
//!
//! Temp artifacts live in a scoped directory that is removed on both the
//! success and the failure path.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use vsplit_media::{move_file, MediaEngine, MediaError, MediaResult};
use vsplit_models::{EncodingConfig, SegmentSpec, SplitConfig};

/// Accepted deviation between expected and probed output duration.
pub const DURATION_TOLERANCE_SECS: f64 = 0.5;

/// Executes planned segments against the media engine.
pub struct SegmentExecutor {
    engine: Arc<dyn MediaEngine>,
    config: SplitConfig,
    encoding: EncodingConfig,
    /// Combined intro + outro duration, probed once up front
    attachment_secs: f64,
}

impl SegmentExecutor {
    /// Create an executor, probing intro/outro durations once.
    pub async fn new(engine: Arc<dyn MediaEngine>, config: SplitConfig) -> MediaResult<Self> {
        let encoding = config.quality.encoding(config.threads);

        let mut attachment_secs = 0.0;
        for attachment in [&config.intro_path, &config.outro_path].into_iter().flatten() {
            attachment_secs += engine.probe(attachment).await?.duration;
        }

        Ok(Self {
            engine,
            config,
            encoding,
            attachment_secs,
        })
    }

    /// Produce the final output file for one segment.
    pub async fn execute(&self, spec: &SegmentSpec) -> MediaResult<PathBuf> {
        let final_path = self.config.output_dir.join(&spec.file_name);

        // Scoped work dir: dropped (and deleted) on every exit path.
        let work_dir = tempfile::tempdir_in(&self.config.output_dir)?;
        let raw_path = work_dir.path().join(format!(
            "segment_{:03}.{}",
            spec.index,
            self.config.output_format.extension()
        ));

        self.engine
            .extract(&self.config.source_path, &raw_path, &spec.range, &self.encoding)
            .await?;

        if self.config.has_attachments() {
            let mut parts = Vec::with_capacity(3);
            if let Some(intro) = &self.config.intro_path {
                parts.push(intro.clone());
            }
            parts.push(raw_path.clone());
            if let Some(outro) = &self.config.outro_path {
                parts.push(outro.clone());
            }
            self.engine
                .concatenate(&parts, &final_path, &self.encoding)
                .await?;
        } else {
            move_file(&raw_path, &final_path).await?;
        }

        self.verify(spec, &final_path).await?;

        debug!("Segment {} finalized at {}", spec.index, final_path.display());
        Ok(final_path)
    }

    /// Verify the produced output against the expected duration.
    async fn verify(&self, spec: &SegmentSpec, path: &Path) -> MediaResult<()> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let info = self.engine.probe(path).await?;
        let expected = spec.range.duration() + self.attachment_secs;
        if (info.duration - expected).abs() > DURATION_TOLERANCE_SECS {
            return Err(MediaError::DurationMismatch {
                expected,
                actual: info.duration,
            });
        }
        Ok(())
    }
}
