//! Split configuration and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::encoding::QualityPreset;

/// Minimum allowed segment length in seconds.
pub const MIN_SEGMENT_SECS: u64 = 60;
/// Maximum allowed segment length in seconds (2 hours).
pub const MAX_SEGMENT_SECS: u64 = 7200;
/// Default segment length in seconds (20 minutes).
pub const DEFAULT_SEGMENT_SECS: u64 = 1200;
/// Default output naming pattern.
pub const DEFAULT_NAMING_PATTERN: &str = "{title}_part{index:02d}_{date}";
/// Maximum FFmpeg thread count accepted.
pub const MAX_THREADS: u32 = 16;

/// Configuration errors raised before any processing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Segment length must be at least {MIN_SEGMENT_SECS} seconds (got {0})")]
    SegmentLengthTooShort(u64),

    #[error("Segment length cannot exceed {MAX_SEGMENT_SECS} seconds (got {0})")]
    SegmentLengthTooLong(u64),

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a file: {0}")]
    SourceNotAFile(PathBuf),

    #[error("Unsupported container format: {0}")]
    UnsupportedFormat(String),

    #[error("Intro/outro file not found: {0}")]
    AttachmentNotFound(PathBuf),

    #[error("Thread count must be between 1 and {MAX_THREADS} (got {0})")]
    InvalidThreadCount(u32),

    #[error("Naming pattern cannot be empty")]
    EmptyNamingPattern,
}

/// Supported output container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp4,
    Mkv,
    Avi,
    Mov,
    Flv,
    Webm,
    Ts,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Mkv => "mkv",
            OutputFormat::Avi => "avi",
            OutputFormat::Mov => "mov",
            OutputFormat::Flv => "flv",
            OutputFormat::Webm => "webm",
            OutputFormat::Ts => "ts",
        }
    }

    /// Parse a file extension (with or without dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "mp4" => Some(OutputFormat::Mp4),
            "mkv" => Some(OutputFormat::Mkv),
            "avi" => Some(OutputFormat::Avi),
            "mov" => Some(OutputFormat::Mov),
            "flv" => Some(OutputFormat::Flv),
            "webm" => Some(OutputFormat::Webm),
            "ts" => Some(OutputFormat::Ts),
            _ => None,
        }
    }

    /// Check whether a path carries a supported container extension.
    pub fn is_supported_source(path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .is_some()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Per-job split configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Source recording to split
    pub source_path: PathBuf,

    /// Directory to write segments into
    pub output_dir: PathBuf,

    /// Maximum segment length in seconds
    #[serde(default = "default_segment_secs")]
    pub max_segment_secs: u64,

    /// Output container format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Naming pattern with {title}, {index[:0Nd]} and {date} placeholders
    #[serde(default = "default_naming_pattern")]
    pub naming_pattern: String,

    /// Quality preset mapped to concrete encoder parameters
    #[serde(default)]
    pub quality: QualityPreset,

    /// Optional intro clip prepended to every segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_path: Option<PathBuf>,

    /// Optional outro clip appended to every segment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outro_path: Option<PathBuf>,

    /// FFmpeg thread count
    #[serde(default = "default_threads")]
    pub threads: u32,
}

fn default_segment_secs() -> u64 {
    DEFAULT_SEGMENT_SECS
}
fn default_naming_pattern() -> String {
    DEFAULT_NAMING_PATTERN.to_string()
}
fn default_threads() -> u32 {
    4
}

impl SplitConfig {
    /// Create a configuration with defaults for everything but the paths.
    pub fn new(source_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            max_segment_secs: DEFAULT_SEGMENT_SECS,
            output_format: OutputFormat::default(),
            naming_pattern: DEFAULT_NAMING_PATTERN.to_string(),
            quality: QualityPreset::default(),
            intro_path: None,
            outro_path: None,
            threads: default_threads(),
        }
    }

    /// Validate the invariants processing depends on.
    ///
    /// The CLI/web layer validates option syntax; this re-checks only what
    /// the core relies on: the segment-length floor and ceiling, a known
    /// container format, existing source and attachment files, and sane
    /// thread counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_segment_secs < MIN_SEGMENT_SECS {
            return Err(ConfigError::SegmentLengthTooShort(self.max_segment_secs));
        }
        if self.max_segment_secs > MAX_SEGMENT_SECS {
            return Err(ConfigError::SegmentLengthTooLong(self.max_segment_secs));
        }
        if self.naming_pattern.trim().is_empty() {
            return Err(ConfigError::EmptyNamingPattern);
        }
        if self.threads == 0 || self.threads > MAX_THREADS {
            return Err(ConfigError::InvalidThreadCount(self.threads));
        }

        if !self.source_path.exists() {
            return Err(ConfigError::SourceNotFound(self.source_path.clone()));
        }
        if !self.source_path.is_file() {
            return Err(ConfigError::SourceNotAFile(self.source_path.clone()));
        }
        if !OutputFormat::is_supported_source(&self.source_path) {
            let ext = self
                .source_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            return Err(ConfigError::UnsupportedFormat(ext));
        }

        for attachment in [&self.intro_path, &self.outro_path].into_iter().flatten() {
            if !attachment.is_file() {
                return Err(ConfigError::AttachmentNotFound(attachment.clone()));
            }
        }

        Ok(())
    }

    /// Whether any intro or outro is configured.
    pub fn has_attachments(&self) -> bool {
        self.intro_path.is_some() || self.outro_path.is_some()
    }

    /// Source title: sanitized file stem of the source path.
    pub fn source_title(&self) -> String {
        let stem = self
            .source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed");
        crate::utils::sanitize_title(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_source(dir: &TempDir, name: &str) -> SplitConfig {
        let source = dir.path().join(name);
        fs::write(&source, b"fake video").unwrap();
        SplitConfig::new(source, dir.path().join("out"))
    }

    #[test]
    fn test_valid_config_passes() {
        let dir = TempDir::new().unwrap();
        let config = config_with_source(&dir, "stream.mp4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_segment_length_floor() {
        let dir = TempDir::new().unwrap();
        let mut config = config_with_source(&dir, "stream.mp4");
        config.max_segment_secs = 30;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentLengthTooShort(30))
        ));
    }

    #[test]
    fn test_segment_length_ceiling() {
        let dir = TempDir::new().unwrap();
        let mut config = config_with_source(&dir, "stream.mp4");
        config.max_segment_secs = 7201;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentLengthTooLong(_))
        ));
    }

    #[test]
    fn test_missing_source_rejected() {
        let dir = TempDir::new().unwrap();
        let config = SplitConfig::new(dir.path().join("missing.mp4"), dir.path());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let config = config_with_source(&dir, "notes.txt");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_missing_intro_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config_with_source(&dir, "stream.mkv");
        config.intro_path = Some(dir.path().join("intro.mp4"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::AttachmentNotFound(_))
        ));
    }

    #[test]
    fn test_thread_bounds() {
        let dir = TempDir::new().unwrap();
        let mut config = config_with_source(&dir, "stream.mp4");
        config.threads = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreadCount(0))
        ));
        config.threads = 17;
        assert!(config.validate().is_err());
        config.threads = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_extension_round_trip() {
        for fmt in [
            OutputFormat::Mp4,
            OutputFormat::Mkv,
            OutputFormat::Avi,
            OutputFormat::Mov,
            OutputFormat::Flv,
            OutputFormat::Webm,
            OutputFormat::Ts,
        ] {
            assert_eq!(OutputFormat::from_extension(fmt.extension()), Some(fmt));
        }
        assert_eq!(OutputFormat::from_extension(".MKV"), Some(OutputFormat::Mkv));
        assert_eq!(OutputFormat::from_extension("wav"), None);
    }

    #[test]
    fn test_source_title_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let config = config_with_source(&dir, "my stream? 2025.mp4");
        assert_eq!(config.source_title(), "my_stream_2025");
    }
}
