//! Guardrail Gateway Anonymization - PII Detection and Anonymization

pub mod adapters;
pub mod anonymizer;
pub mod config;
pub mod detector;
pub mod method;
pub mod placeholder;
pub mod replacer;
pub mod types;
pub mod vault;

// Re-exports
pub use adapters::{InMemoryVault, RegexEntityDetector, TracingAuditLogger};
pub use anonymizer::{Anonymizer, AnonymizeResult, RestoreResult};
pub use config::{AnonymizerConfig, PlaceholderFormat};
pub use detector::EntityDetector;
pub use method::Method as AnonymizationMethod;
pub use placeholder::PlaceholderGenerator;
pub use replacer::{replace_entities, restore_placeholders};
pub use types::{EntityMatch, EntityMapping, EntityType};

/// Result type for anonymization operations
pub type Result<T> = std::result::Result<T, AnonymizationError>;

/// Errors that can occur during anonymization
#[derive(Debug, thiserror::Error)]
pub enum AnonymizationError {
    #[error("Empty input text")]
    EmptyInput,

    #[error("Invalid entity range: {0}")]
    InvalidRange(String),

    #[error("Detector error: {0}")]
    DetectorError(String),

    #[error("Vault error: {0}")]
    VaultError(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Placeholder generation failed: {0}")]
    PlaceholderError(String),
}
