//! Intro/segment/outro concatenation.
//!
//! Two strategies, selected automatically:
//!
//! 1. **Stream copy** via the concat demuxer when codec and resolution
//!    match across all parts. No re-encode, near-instant.
//! 2. **Re-encode** via `filter_complex concat` when parts are not
//!    compatible, or when the stream copy itself fails. Slower, always
//!    valid. This fallback is never user-triggered.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use vsplit_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::probe::{probe_source, SourceMetadata};

/// Concatenate the given parts into `output`.
///
/// Parts are probed once to decide the strategy; a mismatch in codec or
/// resolution is not an error, it just selects the re-encode path.
pub async fn concatenate(
    parts: &[PathBuf],
    output: impl AsRef<Path>,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let output = output.as_ref();

    let mut infos = Vec::with_capacity(parts.len());
    for part in parts {
        infos.push(probe_source(part).await?);
    }

    if parts_compatible(&infos) {
        match concat_stream_copy(parts, output).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!(
                    "Stream-copy concatenation failed ({}), falling back to re-encode",
                    e
                );
            }
        }
    } else {
        info!("Parts differ in codec or resolution, concatenating with re-encode");
    }

    concat_reencode(parts, output, encoding).await
}

/// Whether all parts share codec and resolution (stream copy is valid).
pub fn parts_compatible(infos: &[SourceMetadata]) -> bool {
    let mut iter = infos.iter();
    let Some(first) = iter.next() else {
        return true;
    };
    iter.all(|info| {
        info.video_codec == first.video_codec
            && info.width == first.width
            && info.height == first.height
    })
}

/// Join parts without re-encoding, using the concat demuxer.
async fn concat_stream_copy(parts: &[PathBuf], output: &Path) -> MediaResult<()> {
    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("concat_list.txt");
    fs::write(&list_path, build_concat_list(parts)).await?;

    info!(
        "Concatenating {} parts into {} (stream copy)",
        parts.len(),
        output.display()
    );

    let cmd = FfmpegCommand::new(&list_path, output)
        .input_format("concat")
        .input_arg("-safe")
        .input_arg("0")
        .stream_copy();

    FfmpegRunner::new().run(&cmd).await
}

/// Join parts with a full re-encode through the concat filter.
async fn concat_reencode(
    parts: &[PathBuf],
    output: &Path,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    info!(
        "Concatenating {} parts into {} (re-encode)",
        parts.len(),
        output.display()
    );

    let mut args = vec!["-y".to_string(), "-v".to_string(), "error".to_string()];
    for part in parts {
        args.push("-i".to_string());
        args.push(part.to_string_lossy().to_string());
    }

    let filter = (0..parts.len())
        .map(|i| format!("[{i}:v][{i}:a]"))
        .collect::<String>()
        + &format!("concat=n={}:v=1:a=1[v][a]", parts.len());

    args.extend([
        "-filter_complex".to_string(),
        filter,
        "-map".to_string(),
        "[v]".to_string(),
        "-map".to_string(),
        "[a]".to_string(),
    ]);
    args.extend(encoding.to_ffmpeg_args());
    args.push(output.to_string_lossy().to_string());

    FfmpegRunner::new().run_args(&args).await
}

/// Build the concat demuxer list file contents.
///
/// Single quotes inside paths are closed, escaped and reopened, which is
/// the quoting the demuxer expects.
fn build_concat_list(parts: &[PathBuf]) -> String {
    let mut list = String::new();
    for part in parts {
        let escaped = part.to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    list
}
