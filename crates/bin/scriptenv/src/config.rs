//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `scriptenv.toml` in the working directory unless `--config`
//! names another file. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_PATH: &str = "scriptenv.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device-repository fixture settings.
    pub fixture: FixtureConfig,
    /// The user scripts run on behalf of.
    pub identity: IdentityConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Fixture file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Path of the JSON snapshot served as the device repository.
    pub path: PathBuf,
}

/// Identity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_id: String,
    /// Lifetime of an exchanged user token, in seconds.
    pub token_ttl_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (or `scriptenv.toml` if present) then
    /// apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, if an explicitly given
    /// file is missing, or if the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(DEFAULT_PATH), false)?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SCRIPTENV_SNAPSHOT") {
            self.fixture.path = PathBuf::from(val);
        }
        if let Some(val) = var("SCRIPTENV_USER_ID") {
            self.identity.user_id = val;
        }
        if let Some(val) = var("SCRIPTENV_TOKEN_TTL_SECS")
            && let Ok(ttl) = val.parse()
        {
            self.identity.token_ttl_secs = ttl;
        }
        if let Some(val) = var("SCRIPTENV_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.user_id.trim().is_empty() {
            return Err(ConfigError::Validation("user id must not be empty".to_string()));
        }
        if self.identity.token_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "token ttl must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fixture.json"),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: "scriptenv".to_string(),
            token_ttl_secs: 3600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "scriptenv=info,scriptenv_app=info,scriptenv_adapter_fixture=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
