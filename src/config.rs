//! Configuration loading.
//!
//! [`Config`] is immutable once built and handed to the
//! [`CellGptBuilder`](crate::CellGptBuilder). It is loaded from TOML with the
//! following resolution order:
//! 1. explicit path (CLI flag)
//! 2. `~/.cellgpt/config.toml` (user)
//! 3. `/etc/cellgpt/config.toml` (system)
//! 4. built-in defaults
//!
//! Every field has a default, so a partial file only overrides what it names.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::CacheDuration;
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::transport::DEFAULT_TIMEOUT_SECS;
use crate::{CellGptError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Model identifiers bound to the facade entry points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelsConfig {
    /// Used by `gpt` unless overridden per call (default: gpt-4o-mini).
    #[serde(default = "default_model")]
    pub default: String,
    /// Fixed low-cost model of `gpt_basic` (default: gpt-4o-mini).
    #[serde(default = "default_model")]
    pub basic: String,
    /// Fixed higher-capability model of `gpt_advanced` (default: gpt-4o).
    #[serde(default = "default_advanced_model")]
    pub advanced: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            basic: default_model(),
            advanced: default_advanced_model(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_advanced_model() -> String {
    "gpt-4o".to_string()
}

/// Default generation parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationConfig {
    /// Maximum completion tokens (default: 256).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (default: 0.0).
    #[serde(default)]
    pub temperature: f64,
    /// Instruction sent ahead of every prompt; empty disables it.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_max_tokens() -> u32 {
    256
}

fn default_system_prompt() -> String {
    "You are a helpful assistant working inside a spreadsheet. \
     Reply with the answer only, without preamble."
        .to_string()
}

/// Request cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    /// Seconds, `0` to disable, or `"indefinite"` (default: 21600, six hours).
    #[serde(default = "default_cache_duration")]
    pub duration: CacheDuration,
    /// Capacity of the built-in in-memory store (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            duration: default_cache_duration(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_cache_duration() -> CacheDuration {
    CacheDuration::from_secs(21_600)
}

fn default_max_entries() -> u64 {
    10_000
}

/// Completion API endpoint settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// Base URL of an OpenAI-compatible API (default: https://api.openai.com/v1).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout in seconds (default: 120).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first user or system file
    /// found is used, falling back to [`Config::default`].
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CellGptError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            CellGptError::Configuration(msg) => {
                CellGptError::Configuration(format!("{msg} (in {path:?})"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CellGptError::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(CellGptError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".cellgpt").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/cellgpt/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.models.default, "gpt-4o-mini");
        assert_eq!(config.models.advanced, "gpt-4o");
        assert_eq!(config.generation.max_tokens, 256);
        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(
            config.cache.duration,
            CacheDuration::Bounded(Duration::from_secs(21_600))
        );
        assert_eq!(config.api.base_url, "https://api.openai.com/v1");
        assert_eq!(config.api.timeout_secs, 120);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [models]
            default = "gpt-4.1-nano"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.models.default, "gpt-4.1-nano");
        // Defaults preserved
        assert_eq!(config.models.basic, "gpt-4o-mini");
        assert_eq!(config.generation.max_tokens, 256);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [models]
            default = "a"
            basic = "b"
            advanced = "c"

            [generation]
            max_tokens = 512
            temperature = 0.7
            system_prompt = ""

            [cache]
            duration = "indefinite"
            max_entries = 50

            [api]
            base_url = "http://localhost:8080/v1"
            timeout_secs = 30
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.models.advanced, "c");
        assert_eq!(config.generation.max_tokens, 512);
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.system_prompt, "");
        assert_eq!(config.cache.duration, CacheDuration::Indefinite);
        assert_eq!(config.cache.max_entries, 50);
        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn zero_duration_disables_cache() {
        let config = Config::from_toml("[cache]\nduration = 0\n").unwrap();
        assert_eq!(config.cache.duration, CacheDuration::Disabled);
    }

    #[test]
    fn bad_duration_keyword_is_configuration_error() {
        let err = Config::from_toml("[cache]\nduration = \"forever\"\n").unwrap_err();
        assert!(matches!(err, CellGptError::Configuration(_)));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }
}
