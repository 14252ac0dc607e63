//! Authentication module
//!
//! ## Overview
//!
//! `sk-xxai-...` API-key and JWT authentication (§4.5):
//! - [`types::generate_api_key`] mints tenant/application/direct-model keys,
//!   stored raw in `guardrail-store`'s tenant/application tables
//! - [`cache::AuthCache`] is the §4.9 read-through cache in front of the
//!   lookup
//! - [`service::AuthService`] ties the two together and issues/verifies
//!   admin-login JWTs
//!
//! ## Architecture
//!
//! ```text
//! Request → auth middleware → AuthService::resolve_api_key → AuthContext
//!                                      ↓            ↓
//!                                 AuthCache   guardrail-store
//! ```

pub mod cache;
pub mod service;
pub mod types;

// Re-exports
pub use cache::AuthCache;
pub use service::AuthService;
pub use types::{generate_api_key, is_well_formed_api_key, ApiKeyKind, AuthContext, Claims, GeneratedApiKey};
