//! Configuration management for chatsweep
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatsweepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for chatsweep
///
/// Holds everything needed to reach the messaging service and to run
/// the interactive shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Messaging-service connection settings
    pub service: ServiceConfig,

    /// Interactive shell settings
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Messaging-service connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the messaging-service API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API token used as a bearer credential
    ///
    /// Usually supplied via the `CHATSWEEP_API_TOKEN` environment variable
    /// rather than stored in the config file.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Timeout for HTTP requests (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Interactive shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Default number of messages fetched when no count is given
    #[serde(default = "default_fetch_limit")]
    pub default_limit: i64,

    /// Directory where exports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_fetch_limit() -> i64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_limit: default_fetch_limit(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            service: ServiceConfig::default(),
            shell: ShellConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatsweepError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatsweepError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("CHATSWEEP_API_BASE") {
            self.service.api_base = api_base;
        }

        if let Ok(api_token) = std::env::var("CHATSWEEP_API_TOKEN") {
            self.service.api_token = Some(api_token);
        }

        if let Ok(limit) = std::env::var("CHATSWEEP_DEFAULT_LIMIT") {
            if let Ok(value) = limit.parse() {
                self.shell.default_limit = value;
            } else {
                tracing::warn!("Invalid CHATSWEEP_DEFAULT_LIMIT: {}", limit);
            }
        }

        if let Ok(output_dir) = std::env::var("CHATSWEEP_OUTPUT_DIR") {
            self.shell.output_dir = PathBuf::from(output_dir);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_base) = &cli.api_base {
            self.service.api_base = api_base.clone();
        }

        if let Some(limit) = cli.limit {
            self.shell.default_limit = limit;
        }
    }

    /// Validate the configuration and normalize out-of-range values
    ///
    /// A non-positive default limit is replaced with 1000 rather than
    /// rejected, matching the shell's session-state contract.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is malformed or the API token is missing
    pub fn validate(&mut self) -> Result<()> {
        url::Url::parse(&self.service.api_base).map_err(|e| {
            ChatsweepError::Config(format!(
                "Invalid api_base '{}': {}",
                self.service.api_base, e
            ))
        })?;

        if !self.service.api_base.starts_with("http") {
            return Err(ChatsweepError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.service.api_base
            ))
            .into());
        }

        match self.service.api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => {
                return Err(ChatsweepError::Config(
                    "No API token configured; set CHATSWEEP_API_TOKEN or service.api_token"
                        .to_string(),
                )
                .into());
            }
        }

        if self.service.timeout_seconds == 0 {
            return Err(
                ChatsweepError::Config("timeout_seconds must be positive".to_string()).into(),
            );
        }

        if self.shell.default_limit <= 0 {
            tracing::warn!(
                "Non-positive default_limit {}, falling back to 1000",
                self.shell.default_limit
            );
            self.shell.default_limit = default_fetch_limit();
        }

        Ok(())
    }
}
