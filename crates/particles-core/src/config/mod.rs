//! Configuration management with file persistence
//!
//! The configuration is loaded once at startup and treated as read-only
//! afterwards. The API credential is never part of the file; it is read from
//! the environment into an [`ApiKey`] that is handed to the client.

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::compression::CompressionLevel;

/// Environment variables consulted for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["PARTICLES_API_KEY", "OPENAI_API_KEY"];

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV_VAR: &str = "PARTICLES_CONFIG_DIR";

/// PARTicles configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub compression: CompressionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Must stay empty; present only so a file that tries to store a key is rejected
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Level used when none is given on the command line
    pub default_level: u8,
    /// Articles longer than this are rejected locally (0 disables the check)
    pub max_input_words: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4-turbo-preview".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_level: CompressionLevel::DEFAULT.pct(),
            max_input_words: 50_000,
        }
    }
}

/// API credential for the completion service
///
/// Constructed once at startup and injected into the client. The value is
/// zeroized on drop and never shown by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    /// Wrap a raw key
    pub fn new(key: impl Into<String>) -> Self {
        Self { inner: key.into() }
    }

    /// Read the key from `PARTICLES_API_KEY` or `OPENAI_API_KEY`
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Resolve the key through `lookup`, trying each of [`API_KEY_ENV_VARS`] in order
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|&var| lookup(var))
            .find(|key| !key.trim().is_empty())
            .map(|key| Self::new(key.trim()))
    }

    /// Get the key value
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Key with everything but the last four characters hidden
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.inner.chars().collect();
        if chars.len() <= 4 {
            "***".to_string()
        } else {
            let suffix: String = chars[chars.len() - 4..].iter().collect();
            format!("***{}", suffix)
        }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("inner", &"[REDACTED]")
            .finish()
    }
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> anyhow::Result<Option<ApiKey>> {
        self.enforce_env_only()?;
        Ok(ApiKey::from_env())
    }

    pub fn redacted_api_key(&self) -> anyhow::Result<Option<String>> {
        self.resolved_api_key()
            .map(|opt| opt.map(|key| key.redacted()))
    }

    pub fn enforce_env_only(&self) -> anyhow::Result<()> {
        if self.api_key.is_some() {
            return Err(anyhow!(
                "API keys must be provided via environment variables, not stored in configuration"
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("particles")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or fall back to defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.enforce_env_only()?;
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be at least 1 second"));
        }
        CompressionLevel::new(self.compression.default_level)
            .map_err(|e| anyhow!("compression.default_level: {}", e))?;
        Ok(())
    }

    /// Default compression level from configuration
    pub fn default_level(&self) -> CompressionLevel {
        CompressionLevel::new(self.compression.default_level).unwrap_or_default()
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "llm.model" => Ok(self.llm.model.clone()),
            "llm.base_url" => Ok(self.llm.base_url.clone()),
            "llm.temperature" => Ok(self.llm.temperature.to_string()),
            "llm.timeout_secs" => Ok(self.llm.timeout_secs.to_string()),

            "compression.default_level" => Ok(self.compression.default_level.to_string()),
            "compression.max_input_words" => Ok(self.compression.max_input_words.to_string()),

            // API key (special handling - show redacted)
            "llm.api_key" | "api_key" => match self.llm.redacted_api_key()? {
                Some(redacted) => Ok(redacted),
                None => Ok(
                    "(not set - use PARTICLES_API_KEY or OPENAI_API_KEY env var)".to_string(),
                ),
            },

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `particles config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "llm.model" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("Model identifier cannot be empty"));
                }
                self.llm.model = value.trim().to_string();
            }
            "llm.base_url" => {
                let url = value.trim().trim_end_matches('/');
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(anyhow!("Base URL must start with http:// or https://"));
                }
                self.llm.base_url = url.to_string();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = temp;
            }
            "llm.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                if secs == 0 {
                    return Err(anyhow!("Timeout must be at least 1 second"));
                }
                self.llm.timeout_secs = secs;
            }

            "compression.default_level" => {
                let level: CompressionLevel = value.parse()?;
                self.compression.default_level = level.pct();
            }
            "compression.max_input_words" => {
                self.compression.max_input_words = value
                    .parse()
                    .with_context(|| format!("Invalid max_input_words value: {}", value))?;
            }

            // API key cannot be set via config
            "llm.api_key" | "api_key" => {
                return Err(anyhow!(
                    "API keys cannot be stored in configuration for security. \
                     Set the PARTICLES_API_KEY or OPENAI_API_KEY environment variable instead."
                ));
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `particles config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "llm.model",
            "llm.base_url",
            "llm.temperature",
            "llm.timeout_secs",
            "llm.api_key",
            "compression.default_level",
            "compression.max_input_words",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
