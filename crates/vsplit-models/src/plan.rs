//! Segment planning.
//!
//! Pure time arithmetic: no I/O, independently testable without a media
//! file. The planner derives contiguous, non-overlapping ranges covering
//! `[0, duration)`; the naming resolver then fixes every output file name
//! before any processing starts, which is what makes dry-run previews and
//! up-front collision detection possible.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::config::SplitConfig;
use crate::naming::{resolve_name, NamingError};

/// Planning errors.
///
/// The 60-second floor on segment length is a configuration invariant and
/// is enforced by `SplitConfig::validate`, not here.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Maximum segment length must be positive (got {0})")]
    InvalidMaxLength(u64),

    #[error("Source duration must be positive (got {0})")]
    InvalidDuration(f64),
}

/// One half-open time range `[start_secs, end_secs)` of the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentRange {
    pub start_secs: f64,
    pub end_secs: f64,
}

impl SegmentRange {
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

/// One planned unit of work, fully determined before processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// 1-based segment index
    pub index: u32,
    /// Time range to extract from the source
    pub range: SegmentRange,
    /// Resolved output file name, extension included
    pub file_name: String,
    /// Whether an intro clip is prepended
    pub with_intro: bool,
    /// Whether an outro clip is appended
    pub with_outro: bool,
}

/// Plan segment ranges for a source of `duration_secs` seconds.
///
/// `count = ceil(duration / max_segment_secs)`; every range except possibly
/// the last has exactly `max_segment_secs` length, ranges are contiguous,
/// and the last range ends exactly at the source duration.
pub fn plan_segments(
    duration_secs: f64,
    max_segment_secs: u64,
) -> Result<Vec<SegmentRange>, PlanError> {
    if max_segment_secs == 0 {
        return Err(PlanError::InvalidMaxLength(max_segment_secs));
    }
    if duration_secs <= 0.0 || !duration_secs.is_finite() {
        return Err(PlanError::InvalidDuration(duration_secs));
    }

    let max_len = max_segment_secs as f64;
    let count = (duration_secs / max_len).ceil() as u64;

    let mut ranges = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = i as f64 * max_len;
        let end = ((i + 1) as f64 * max_len).min(duration_secs);
        ranges.push(SegmentRange::new(start, end));
    }

    Ok(ranges)
}

/// Resolve the full list of segment specs for a job.
///
/// Detects file-name collisions here, before any processing: two segments
/// resolving to the same name is a configuration error, not something to
/// discover mid-run.
pub fn build_segment_specs(
    config: &SplitConfig,
    ranges: &[SegmentRange],
    date: &str,
) -> Result<Vec<SegmentSpec>, NamingError> {
    let title = config.source_title();
    let mut seen = HashSet::new();
    let mut specs = Vec::with_capacity(ranges.len());

    for (i, range) in ranges.iter().enumerate() {
        let index = (i + 1) as u32;
        let stem = resolve_name(&config.naming_pattern, index, &title, date)?;
        let file_name = format!("{}.{}", stem, config.output_format.extension());
        if !seen.insert(file_name.clone()) {
            return Err(NamingError::FilenameCollision(file_name));
        }
        specs.push(SegmentSpec {
            index,
            range: *range,
            file_name,
            with_intro: config.intro_path.is_some(),
            with_outro: config.outro_path.is_some(),
        });
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_single_segment_when_duration_fits() {
        let ranges = plan_segments(1200.0, 1200).unwrap();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0], SegmentRange::new(0.0, 1200.0));
    }

    #[test]
    fn test_short_tail_segment() {
        let ranges = plan_segments(1250.0, 600).unwrap();
        assert_eq!(
            ranges,
            vec![
                SegmentRange::new(0.0, 600.0),
                SegmentRange::new(600.0, 1200.0),
                SegmentRange::new(1200.0, 1250.0),
            ]
        );
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let ranges = plan_segments(1800.0, 600).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2], SegmentRange::new(1200.0, 1800.0));
    }

    #[test]
    fn test_duration_shorter_than_max() {
        let ranges = plan_segments(90.0, 600).unwrap();
        assert_eq!(ranges, vec![SegmentRange::new(0.0, 90.0)]);
    }

    #[test]
    fn test_coverage_properties() {
        for (duration, max_len) in [
            (1250.0, 600u64),
            (3600.0, 1200),
            (59.5, 60),
            (7200.0, 7200),
            (10000.0, 3333),
        ] {
            let ranges = plan_segments(duration, max_len).unwrap();
            let expected_count = (duration / max_len as f64).ceil() as usize;
            assert_eq!(ranges.len(), expected_count);

            // Contiguous, monotonically increasing, covering [0, duration).
            assert_eq!(ranges[0].start_secs, 0.0);
            for window in ranges.windows(2) {
                assert_eq!(window[0].end_secs, window[1].start_secs);
                assert!(window[0].duration() > 0.0);
            }
            assert_eq!(ranges.last().unwrap().end_secs, duration);

            // All but the last range have exactly max_len length.
            for range in &ranges[..ranges.len() - 1] {
                assert!((range.duration() - max_len as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            plan_segments(1200.0, 0),
            Err(PlanError::InvalidMaxLength(0))
        ));
        assert!(matches!(
            plan_segments(0.0, 600),
            Err(PlanError::InvalidDuration(_))
        ));
        assert!(matches!(
            plan_segments(-5.0, 600),
            Err(PlanError::InvalidDuration(_))
        ));
    }

    fn config_in(dir: &TempDir) -> SplitConfig {
        let source = dir.path().join("stream.mp4");
        fs::write(&source, b"x").unwrap();
        SplitConfig::new(source, dir.path().join("out"))
    }

    #[test]
    fn test_build_specs_resolves_names_in_order() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let ranges = plan_segments(1250.0, 600).unwrap();
        let specs = build_segment_specs(&config, &ranges, "20250115").unwrap();

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].index, 1);
        assert_eq!(specs[0].file_name, "stream_part01_20250115.mp4");
        assert_eq!(specs[2].file_name, "stream_part03_20250115.mp4");
        assert!(!specs[0].with_intro);
    }

    #[test]
    fn test_build_specs_detects_collisions() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        // No index placeholder: every segment resolves to the same name.
        config.naming_pattern = "{title}_{date}".to_string();
        let ranges = plan_segments(1250.0, 600).unwrap();
        let err = build_segment_specs(&config, &ranges, "20250115").unwrap_err();
        assert!(matches!(err, NamingError::FilenameCollision(_)));
    }

    #[test]
    fn test_build_specs_flags_attachments() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        let intro = dir.path().join("intro.mp4");
        fs::write(&intro, b"x").unwrap();
        config.intro_path = Some(intro);

        let ranges = plan_segments(600.0, 600).unwrap();
        let specs = build_segment_specs(&config, &ranges, "20250115").unwrap();
        assert!(specs[0].with_intro);
        assert!(!specs[0].with_outro);
    }
}
