//! Error types for session persistence.

use thiserror::Error;

/// Errors raised by session persistence backends.
///
/// A missing record is never an error: `SessionStore::get` reports absence
/// as `None` and `SessionStore::del` is a no-op for unknown ids.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying database failure (connection, I/O, SQL)
    #[error("database error: {0}")]
    Database(String),

    /// A session with this id already exists
    #[error("duplicate session id: {0}")]
    DuplicateId(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}
