/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error(transparent)]
    Client(#[from] gigset_client::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
