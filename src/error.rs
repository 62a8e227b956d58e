//! Error types for the forum server.

use thiserror::Error;

/// Common error type for the forum server.
#[derive(Error, Debug)]
pub enum ForumError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unique constraint violation (duplicate username, board name, ...).
    #[error("{0} already exists")]
    Conflict(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Avatar storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ForumError {
    fn from(e: sqlx::Error) -> Self {
        ForumError::Database(e.to_string())
    }
}

impl ForumError {
    /// Map a sqlx error, turning unique constraint violations into `Conflict`.
    pub fn from_write(e: sqlx::Error, what: &str) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ForumError::Conflict(what.to_string())
            }
            _ => ForumError::Database(e.to_string()),
        }
    }
}

/// Result type alias for forum operations.
pub type Result<T> = std::result::Result<T, ForumError>;
