//! Segment extraction.

use std::path::Path;
use tracing::info;

use vsplit_models::{EncodingConfig, SegmentRange};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract exactly `[start, end)` from `input` into `output`, applying the
/// quality preset's encoder parameters.
pub async fn extract_segment(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    range: &SegmentRange,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting segment: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        range.start_secs,
        range.duration()
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(range.start_secs)
        .duration(range.duration())
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}
