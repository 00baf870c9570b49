//! Common error types for Spoke

use thiserror::Error;

/// Common result type for Spoke operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Spoke modules
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input at the persistence boundary (rejected, never clamped)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested record does not exist or belongs to another user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Absent, expired, or unknown credential
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network or remote-server failure; safe to retry on the next edit
    #[error("Transient error: {0}")]
    Transient(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
