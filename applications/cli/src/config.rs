/// CLI configuration
use crate::error::{CliError, Result};
use gigset_client::{FileTokenStore, TokenStore};
use gigset_core::LOCAL_INVOKE_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "gigset.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Endpoint used when `--endpoint` is not given
    #[serde(default)]
    pub endpoint: String,

    /// Start every session in local mode
    #[serde(default)]
    pub local_mode: bool,

    /// Where the bearer token is cached (defaults to the platform data dir)
    #[serde(default)]
    pub token_file: Option<PathBuf>,

    #[serde(default = "default_proxy")]
    pub proxy: ProxySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxySettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_target_url")]
    pub target_url: String,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `gigset.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (GIGSET_ENDPOINT, GIGSET_PROXY__PORT, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("GIGSET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let target = url::Url::parse(&self.proxy.target_url)
            .map_err(|e| CliError::Config(format!("Invalid proxy target URL: {}", e)))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(CliError::Config(
                "Proxy target must be an http:// or https:// URL".to_string(),
            ));
        }

        if self.proxy.port == 0 {
            return Err(CliError::Config("Proxy port cannot be 0".to_string()));
        }

        Ok(())
    }

    /// The token cache this configuration points at.
    pub fn token_store(&self) -> Result<FileTokenStore> {
        match &self.token_file {
            Some(path) => Ok(FileTokenStore::new(path)),
            None => Ok(FileTokenStore::default_location()?),
        }
    }

    /// Cached token, if any, with read errors treated as "none".
    pub fn cached_token(&self) -> Option<String> {
        self.token_store()
            .ok()
            .and_then(|store| store.load().ok().flatten())
    }
}

// Default values
fn default_proxy() -> ProxySettings {
    ProxySettings {
        host: default_host(),
        port: default_port(),
        target_url: default_target_url(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_target_url() -> String {
    format!("http://localhost:9000{}", LOCAL_INVOKE_PATH)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            local_mode: false,
            token_file: None,
            proxy: default_proxy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert!(config.endpoint.is_empty());
        assert!(!config.local_mode);
        assert_eq!(config.proxy.host, "127.0.0.1");
        assert_eq!(config.proxy.port, 8787);
        assert_eq!(
            config.proxy.target_url,
            "http://localhost:9000/2015-03-31/functions/function/invocations"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gigset.toml");
        std::fs::write(
            &path,
            r#"
endpoint = "https://fn.example.com/"
local_mode = true
token_file = "/tmp/gigset-token.json"

[proxy]
port = 9999
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.endpoint, "https://fn.example.com/");
        assert!(config.local_mode);
        assert_eq!(
            config.token_file.as_deref(),
            Some(Path::new("/tmp/gigset-token.json"))
        );
        assert_eq!(config.proxy.port, 9999);
        assert_eq!(config.proxy.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = CliConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_target() {
        let mut config = CliConfig::default();
        config.proxy.target_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.proxy.target_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_store_override() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            token_file: Some(dir.path().join("token.json")),
            ..CliConfig::default()
        };

        assert_eq!(config.cached_token(), None);
        config.token_store().unwrap().save("abc").unwrap();
        assert_eq!(config.cached_token().as_deref(), Some("abc"));
    }
}
