//! Store-local error type, convertible into `guardrail_core::Error` at the
//! API boundary (§7).

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<Error> for guardrail_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => guardrail_core::Error::NotFound(msg),
            Error::Conflict(msg) => guardrail_core::Error::Conflict(msg),
            other => guardrail_core::Error::Internal(other.to_string()),
        }
    }
}
