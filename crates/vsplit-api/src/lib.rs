//! Axum HTTP API server.
//!
//! This crate provides:
//! - Job submission, status polling, listing and cancellation
//! - Source upload with a size cap
//! - Output download restricted to a job's recorded outputs
//! - Prometheus metrics and health/readiness probes

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
