//! Configuration management for Quotecast

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Default chance that a run posts a poll instead of a quote
pub const DEFAULT_POLL_PROBABILITY: f64 = 0.2;

pub const ENV_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_API_SECRET: &str = "TWITTER_API_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub logging: LogFileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Quote/poll catalog (JSON)
    #[serde(default = "default_catalog_path")]
    pub catalog: String,
    /// Rotation log of recently used quotes (JSON)
    #[serde(default = "default_history_path")]
    pub history: String,
    #[serde(default = "default_poll_probability")]
    pub poll_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Base URL for the Twitter API v2
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogFileConfig {
    /// Also append log lines to this file
    pub file: Option<String>,
}

fn default_catalog_path() -> String {
    "~/.config/quotecast/quotes.json".to_string()
}

fn default_history_path() -> String {
    "~/.local/share/quotecast/used_quotes.json".to_string()
}

fn default_poll_probability() -> f64 {
    DEFAULT_POLL_PROBABILITY
}

fn default_api_url() -> String {
    "https://api.twitter.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            history: default_history_path(),
            poll_probability: default_poll_probability(),
        }
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TwitterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing config file is not an error: every field has a default.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let p = self.content.poll_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidValue {
                field: "content.poll_probability".to_string(),
                reason: format!("must be between 0.0 and 1.0 (got {})", p),
            }
            .into());
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> Result<PathBuf> {
        expand_path(&self.content.catalog)
    }

    pub fn history_path(&self) -> Result<PathBuf> {
        expand_path(&self.content.history)
    }

    pub fn log_file_path(&self) -> Result<Option<PathBuf>> {
        self.logging.file.as_deref().map(expand_path).transpose()
    }
}

/// OAuth 1.0a user-context credentials for the Twitter API
pub struct Credentials {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    pub access_token: SecretString,
    pub access_token_secret: SecretString,
    pub bearer_token: Option<SecretString>,
}

impl Credentials {
    /// Read credentials from the process environment
    ///
    /// All four OAuth 1.0a values are required; the bearer token is optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<SecretString> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
                .ok_or_else(|| ConfigError::MissingCredential(key.to_string()).into())
        };

        Ok(Self {
            api_key: required(ENV_API_KEY)?,
            api_secret: required(ENV_API_SECRET)?,
            access_token: required(ENV_ACCESS_TOKEN)?,
            access_token_secret: required(ENV_ACCESS_TOKEN_SECRET)?,
            bearer_token: lookup(ENV_BEARER_TOKEN)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("access_token_secret", &"[REDACTED]")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("QUOTECAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("quotecast").join("config.toml"))
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| ConfigError::InvalidValue {
        field: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
