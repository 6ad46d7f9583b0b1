//! Configuration management for the ProbModelSEED client
//!
//! Configuration is layered: YAML file, then environment variables, then CLI
//! flags. A missing file is not an error; defaults are used instead.

use crate::error::{ProbModelSeedError, Result};
use crate::rpc::client::DEFAULT_SERVICE_URL;
use crate::rpc::AuthInfo;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service endpoint settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Service endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// JSON-RPC endpoint
    #[serde(default = "default_service_url")]
    pub url: String,

    /// Per-request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            timeout_seconds: None,
        }
    }
}

/// Credential configuration
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Static token sent in the `Authorization` header
    #[serde(default)]
    pub token: String,

    /// User the token belongs to; also the keyring account
    #[serde(default)]
    pub user_id: String,

    /// Read the token from the OS keyring on every request
    #[serde(default)]
    pub use_keyring: bool,
}

impl AuthConfig {
    /// Static credentials as an [`AuthInfo`] pair.
    pub fn info(&self) -> AuthInfo {
        AuthInfo {
            token: self.token.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("user_id", &self.user_id)
            .field("use_keyring", &self.use_keyring)
            .finish()
    }
}

impl Config {
    /// Load configuration from `path`, then apply environment and CLI
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProbModelSeedError::Config(format!("Failed to read config file: {}", e))
        })?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ProbModelSeedError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("PROBMODELSEED_URL") {
            self.service.url = url;
        }

        if let Ok(token) = std::env::var("PROBMODELSEED_TOKEN") {
            self.auth.token = token;
        }

        if let Ok(user_id) = std::env::var("PROBMODELSEED_USER_ID") {
            self.auth.user_id = user_id;
        }

        if let Ok(timeout) = std::env::var("PROBMODELSEED_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.service.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid PROBMODELSEED_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.url {
            tracing::debug!("Using service URL override: {}", url);
            self.service.url = url.clone();
        }
        if let Some(token) = &cli.token {
            self.auth.token = token.clone();
        }
    }

    /// Validate the configuration.
    ///
    /// An empty URL is accepted; the client falls back to the default
    /// endpoint for it.
    pub fn validate(&self) -> Result<()> {
        if !self.service.url.is_empty() {
            let parsed = url::Url::parse(&self.service.url).map_err(|e| {
                ProbModelSeedError::Config(format!(
                    "Invalid service.url '{}': {}",
                    self.service.url, e
                ))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ProbModelSeedError::Config(format!(
                    "service.url must use http or https, got '{}'",
                    parsed.scheme()
                ))
                .into());
            }
        }

        if self.service.timeout_seconds == Some(0) {
            return Err(ProbModelSeedError::Config(
                "service.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.auth.use_keyring && self.auth.user_id.is_empty() {
            tracing::debug!("auth.use_keyring without auth.user_id; using the default account");
        }

        Ok(())
    }
}
