//! Store-level error taxonomy shared by the para crates

use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds the storage and configuration layers can produce. The
/// service crate maps these onto HTTP statuses at the boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying persistence failure (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while locating or creating the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation failure
    #[error("Configuration error: {0}")]
    Config(String),

    /// An id that does not resolve to a record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input value (bad date, unknown status, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// One-way state rules reject the write (already-processed inbox
    /// item, archived memory)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invariant violation inside the store layer
    #[error("Internal error: {0}")]
    Internal(String),
}
