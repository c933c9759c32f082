//! MindPrint error types

use thiserror::Error;

/// MindPrint error type
#[derive(Error, Debug)]
pub enum Error {
    /// Neither memory source file exists
    #[error("No memory files found.")]
    SourceNotFound,

    /// Pattern application failed; the run is aborted before any write
    #[error("Redaction error: {0}")]
    Redaction(String),

    /// I/O failure while writing a cognition document
    #[error("Write error: {0}")]
    Write(String),

    /// Seller has no saved cognition asset
    #[error("Seller has no published cognition profile")]
    SellerNotFound,

    /// Rental token is unknown
    #[error("Rental token not recognized")]
    TokenNotFound,

    /// Rental token has passed its expiry
    #[error("Rental token expired")]
    TokenExpired,

    /// Rental token has been revoked
    #[error("Rental token revoked")]
    TokenRevoked,

    /// Store timed out or is unreachable; retryable
    #[error("Store unavailable: {0}")]
    Store(String),

    /// Cognition document is malformed
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller may retry the operation (with backoff).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(_) | Error::Write(_))
    }

    /// External-facing message.
    ///
    /// Expired and revoked tokens render identically: the distinction is
    /// kept internally but not disclosed to the token holder.
    pub fn user_message(&self) -> String {
        match self {
            Error::TokenExpired | Error::TokenRevoked => {
                "Rental token is no longer valid".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Store(e.to_string())
    }
}

/// Result type alias for MindPrint operations
pub type Result<T> = std::result::Result<T, Error>;
