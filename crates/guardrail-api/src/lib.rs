//! Guardrail Gateway REST API
//!
//! Three HTTP services (admin, detection, proxy — see `src/bin/`) sharing
//! one [`state::AppState`] and this library's handlers, middleware, and
//! configuration layer.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod extractors;
pub mod handlers;
pub mod log_pipeline;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod rate_limiting;
pub mod router;
pub mod server;
pub mod state;
pub mod templates;

// Re-exports
pub use config::AppConfig;
pub use models::ApiError;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
