//! Shared data models for the VSplit backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and their lifecycle
//! - Split configuration and validation
//! - Quality presets and encoding parameters
//! - Segment planning and output naming

pub mod config;
pub mod encoding;
pub mod job;
pub mod naming;
pub mod plan;
pub mod timestamp;
pub mod utils;

// Re-export common types
pub use config::{
    ConfigError, OutputFormat, SplitConfig, DEFAULT_NAMING_PATTERN, DEFAULT_SEGMENT_SECS,
    MAX_SEGMENT_SECS, MIN_SEGMENT_SECS,
};
pub use encoding::{EncodingConfig, QualityPreset};
pub use job::{Job, JobId, JobStatus};
pub use naming::{resolve_name, NamingError};
pub use plan::{build_segment_specs, plan_segments, PlanError, SegmentRange, SegmentSpec};
pub use timestamp::{format_duration, parse_duration, DurationError};
pub use utils::{format_bytes, sanitize_title};
