//! Job orchestration for the VSplit backend.
//!
//! This crate provides:
//! - The in-memory job store (snapshot reads, last-N retention)
//! - The segment executor (extract, concatenate, verify, scoped cleanup)
//! - The orchestrator (fail-fast submission, background processing loop,
//!   cooperative cancellation between segments)

pub mod error;
pub mod executor;
pub mod logging;
pub mod orchestrator;
pub mod settings;
pub mod store;

pub use error::{JobError, JobResult};
pub use executor::{SegmentExecutor, DURATION_TOLERANCE_SECS};
pub use logging::JobLogger;
pub use orchestrator::Orchestrator;
pub use settings::JobSettings;
pub use store::JobStore;
