//! HTTP API for course progress: completions, answer grading and summaries.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod progress;
pub mod router;
pub mod state;
pub mod task;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
