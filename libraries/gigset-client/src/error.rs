//! Error types for the gigset client.

use thiserror::Error;

/// Errors that can occur when talking to the playlist function or the token cache.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint is offline or unreachable
    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    /// Invalid endpoint URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// Request could not be shaped from the form
    #[error(transparent)]
    Core(#[from] gigset_core::GigsetError),

    /// No platform data directory for the token cache
    #[error("Could not determine local data directory")]
    NoDataDir,

    /// IO error while reading or writing the token cache
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Token cache file is not valid JSON
    #[error("Failed to parse token cache: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
