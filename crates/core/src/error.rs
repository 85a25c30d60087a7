//! Error types for piggin-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for piggin-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for piggin-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed path string
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Destination missing, not a directory, or wrong protocol on either side
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Non-recursive delete of a bucket or prefix that still has entries
    #[error("Cannot delete {0}: not empty")]
    NotEmpty(String),

    /// Transport failure for a single object
    #[error("Transfer of {key} failed: {message}")]
    Transfer { key: String, message: String },

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Operation cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) | Error::Precondition(_) | Error::Config(_) => 1, // UsageError
            Error::Network(_) | Error::Transfer { .. } => 3, // NetworkError
            Error::Auth(_) => 4,                             // AuthError
            Error::NotFound(_) => 5,                         // NotFound
            Error::NotEmpty(_) => 6,                         // Conflict
            Error::Cancelled => 130,                         // Interrupted
            _ => 2,                                          // GeneralError
        }
    }

    /// Wrap any displayable failure as a transfer error for `key`
    pub fn transfer(key: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::Transfer {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 1);
        assert_eq!(Error::Precondition("test".into()).exit_code(), 1);
        assert_eq!(Error::Config("test".into()).exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::transfer("a.txt", "reset").exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::NotEmpty("test".into()).exit_code(), 6);
        assert_eq!(Error::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotEmpty("s3:bucket/".into());
        assert_eq!(err.to_string(), "Cannot delete s3:bucket/: not empty");

        let err = Error::InvalidPath("a:b:c".into());
        assert_eq!(err.to_string(), "Invalid path: a:b:c");

        let err = Error::transfer("dir/a.txt", "connection reset");
        assert_eq!(
            err.to_string(),
            "Transfer of dir/a.txt failed: connection reset"
        );
    }
}
