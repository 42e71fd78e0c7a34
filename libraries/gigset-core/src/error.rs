/// Core error types for gigset
use thiserror::Error;

/// Result type alias using `GigsetError`
pub type Result<T> = std::result::Result<T, GigsetError>;

/// Core error type for gigset
#[derive(Error, Debug)]
pub enum GigsetError {
    /// Band list was empty after parsing
    #[error("At least one band is required.")]
    NoBands,

    /// Endpoint field was blank
    #[error("Endpoint URL is required.")]
    NoEndpoint,

    /// A playlist name was typed but no bearer token is available
    #[error("Add a bearer token to create the playlist, or clear the playlist name to preview.")]
    TokenRequired,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// JSON encoding errors
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl GigsetError {
    /// Whether the error comes from form validation (nothing was sent).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GigsetError::NoBands | GigsetError::NoEndpoint | GigsetError::TokenRequired
        )
    }
}

impl From<url::ParseError> for GigsetError {
    fn from(err: url::ParseError) -> Self {
        GigsetError::InvalidUrl(err.to_string())
    }
}
