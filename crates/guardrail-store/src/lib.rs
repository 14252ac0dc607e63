//! Persistence layer for Guardrail Gateway (§3 DATA MODEL).
//!
//! Every entity is an `sqlx::FromRow` struct in [`models`]; `repo` holds the
//! query functions the scanner engine, disposition resolver, and admin API
//! need. Migrations are embedded via `sqlx::migrate!` and run once at
//! startup from each binary's `main.rs`.

pub mod error;
pub mod models;
pub mod pool;
pub mod repo;

pub use error::{Error, Result};
pub use pool::{connect, MIGRATOR};
