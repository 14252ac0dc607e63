//! Scanner implementations for Python bindings.
//!
//! This module provides Python bindings for all Guardrail Gateway scanners,
//! including both input and output scanners.

pub mod input;
pub mod output;

// Re-export all scanners for convenience
pub use input::*;
pub use output::*;
