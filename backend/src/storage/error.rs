//! Error types for upload URL signing

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while issuing an upload URL
#[derive(Error, Debug)]
pub enum StorageError {
    /// The presigning configuration was rejected
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The signer failed to produce a URL
    #[error("Failed to presign request: {0}")]
    Presign(String),

    /// The signer was asked for a method it does not presign
    #[error("Unsupported method for presigning: {0}")]
    UnsupportedMethod(http::Method),
}
