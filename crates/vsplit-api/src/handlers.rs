//! API handlers.

pub mod download;
pub mod health;
pub mod jobs;
pub mod upload;

pub use health::{health, ready};
