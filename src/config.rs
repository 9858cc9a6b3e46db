//! Client configuration
//!
//! Provides TOML-based configuration with defaults, environment overrides
//! and validation. Location: ~/.ollamakit/config.toml

use crate::errors::{ClientError, Result};
use crate::logging::LogLevel;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings read by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub debug: bool,
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
            debug: false,
            log_level: LogLevel::Info,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with OLLAMA_* environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay OLLAMA_* environment variables onto this configuration
    pub fn with_env(mut self) -> Result<Self> {
        self.apply_env(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ClientError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| ClientError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, falling back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(ClientConfig::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ollamakit").join("config.toml"))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ClientError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ClientError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::ConfigError(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::ConfigError(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Level the client's logger should run at
    pub fn effective_log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout (rounded up to whole seconds, minimum 1)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let partial = u64::from(timeout.subsec_nanos() > 0);
        self.timeout_secs = timeout.as_secs().saturating_add(partial).max(1);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("OLLAMA_HOST").filter(|h| !h.trim().is_empty()) {
            let host = host.trim();
            self.base_url = if host.starts_with("http://") || host.starts_with("https://") {
                host.to_string()
            } else {
                format!("http://{}", host)
            };
        }

        if let Some(key) = lookup("OLLAMA_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }

        if let Some(debug) = lookup("OLLAMA_DEBUG") {
            self.debug = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes"
            );
        }

        if let Some(level) = lookup("OLLAMA_LOG_LEVEL") {
            self.log_level = level.parse()?;
        }

        Ok(())
    }
}
