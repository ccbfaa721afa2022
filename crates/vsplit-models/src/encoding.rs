//! Quality presets and encoder parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Named quality shorthand mapped to concrete encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::High => "high",
            QualityPreset::Medium => "medium",
            QualityPreset::Low => "low",
        }
    }

    /// Constant Rate Factor for this preset (lower is better quality).
    pub fn crf(&self) -> u8 {
        match self {
            QualityPreset::High => 18,
            QualityPreset::Medium => 23,
            QualityPreset::Low => 28,
        }
    }

    /// Encoder speed/efficiency trade-off knob.
    pub fn speed_preset(&self) -> &'static str {
        match self {
            QualityPreset::High => "slow",
            QualityPreset::Medium => "medium",
            QualityPreset::Low => "veryfast",
        }
    }

    /// Expand into a full encoding configuration.
    pub fn encoding(&self, threads: u32) -> EncodingConfig {
        EncodingConfig {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: self.speed_preset().to_string(),
            crf: self.crf(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            threads,
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    pub codec: String,
    /// Encoding preset (e.g., "fast", "medium", "slow")
    pub preset: String,
    /// Constant Rate Factor (quality, 0-51, lower is better)
    pub crf: u8,
    /// Audio codec
    pub audio_codec: String,
    /// Audio bitrate
    pub audio_bitrate: String,
    /// FFmpeg thread count
    pub threads: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        QualityPreset::default().encoding(4)
    }
}

impl EncodingConfig {
    /// Convert to FFmpeg output arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
            "-threads".to_string(),
            self.threads.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_mapping() {
        assert_eq!(QualityPreset::High.crf(), 18);
        assert_eq!(QualityPreset::High.speed_preset(), "slow");
        assert_eq!(QualityPreset::Medium.crf(), 23);
        assert_eq!(QualityPreset::Low.crf(), 28);
        assert_eq!(QualityPreset::Low.speed_preset(), "veryfast");
    }

    #[test]
    fn test_ffmpeg_args() {
        let config = QualityPreset::Medium.encoding(4);
        let args = config.to_ffmpeg_args();
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"23".to_string()));
        assert!(args.contains(&"-threads".to_string()));
    }

    #[test]
    fn test_preset_serde_names() {
        let json = serde_json::to_string(&QualityPreset::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: QualityPreset = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, QualityPreset::Low);
    }
}
