//! gigset command line: submit setlist forms, manage the cached token and run
//! the local CORS proxy.

pub mod config;
pub mod error;
pub mod proxy;
pub mod view;

pub use config::{CliConfig, ProxySettings};
pub use error::{CliError, Result};
