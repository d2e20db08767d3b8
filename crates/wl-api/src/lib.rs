//! HTTP API for recording study outcomes and reading due words and deck statistics.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;
pub mod study;
pub mod tracing;

pub use config::ApiConfig;
pub use state::{ApiState, AuthConfig};
