//! Suite configuration
//!
//! `SuiteConfig` carries the base URL and credentials for one run. It is
//! built once at process start (from an env file, the process environment or
//! a TOML file) and passed by reference to everything that needs it; nothing
//! in the library reads ambient environment state on its own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment keys recognised in env files and the process environment
pub const BASE_URL_KEY: &str = "BASE_URL";
pub const USERNAME_KEY: &str = "AUTH_USERNAME";
pub const PASSWORD_KEY: &str = "AUTH_PASSWORD";
pub const TIMEOUT_KEY: &str = "REQUEST_TIMEOUT_SECS";

/// Errors that can occur while loading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Missing(key) => {
                format!(
                    "Missing required setting: {key}\n\n\
                    Hints:\n\
                    - Add {key}=... to your .env file\n\
                    - Or export {key} in the environment\n\
                    - Required keys: {BASE_URL_KEY}, {USERNAME_KEY}, {PASSWORD_KEY}"
                )
            }
            ConfigError::Io { path, .. } => {
                format!(
                    "{}\n\n\
                    Hint: pass --env-file with the path to your env file (looked for {})",
                    self,
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Connection settings and credentials for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Base URL of the Book Library service, without trailing slash
    pub base_url: String,

    /// Username for `POST /auth/login`
    pub username: String,

    /// Password for `POST /auth/login`
    pub password: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl SuiteConfig {
    /// Create a config with the default timeout
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Set timeout in seconds
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Point at a different server, keeping credentials
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load from a `KEY=VALUE` env file
    ///
    /// Blank lines and `#` comments are skipped, an `export ` prefix is
    /// allowed and values may be wrapped in single or double quotes.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let vars = parse_env_lines(&content)?;
        Self::from_map(&vars)
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = [BASE_URL_KEY, USERNAME_KEY, PASSWORD_KEY, TIMEOUT_KEY]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self::from_map(&vars)
    }

    /// Load from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SuiteConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let base_url = config.base_url.clone();
        let config = config.with_base_url(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Build from already-collected key/value pairs
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let mut config = Self::new(
            required(BASE_URL_KEY)?,
            required(USERNAME_KEY)?,
            required(PASSWORD_KEY)?,
        );

        if let Some(raw) = vars.get(TIMEOUT_KEY).map(|v| v.trim()).filter(|v| !v.is_empty()) {
            let seconds = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: TIMEOUT_KEY.to_string(),
                message: format!("'{}' is not a number of seconds: {}", raw, e),
            })?;
            config = config.with_timeout(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is HTTP(S) and the timeout is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: BASE_URL_KEY.to_string(),
                message: format!("'{}' must start with http:// or https://", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: TIMEOUT_KEY.to_string(),
                message: "timeout must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse `KEY=VALUE` lines into a map
fn parse_env_lines(input: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut vars = HashMap::new();

    for (idx, line) in input.lines().enumerate() {
        let raw = line.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let raw = raw.strip_prefix("export ").unwrap_or(raw);

        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ConfigError::Parse(format!("line {}: expected KEY=VALUE, got `{}`", idx + 1, raw)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Parse(format!("line {}: key cannot be empty", idx + 1)));
        }

        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    Ok(vars)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
