//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed `NEWS_AGGREGATOR__` with `__` between
//! section and key (e.g. `NEWS_AGGREGATOR__SEARCH__DEFAULT_PAGE_SIZE=20`).
//! API keys left unset fall back to each provider's own variable.

mod file_config;

pub use file_config::{default_config_path, find_config_file, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::{Category, DEFAULT_PAGE_SIZE};

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "NEWS_AGGREGATOR";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API keys for the news providers
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Request settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Provider selection
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Feed preferences applied when a search leaves them unset
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API keys for the news providers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeys {
    /// The Guardian content API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian: Option<String>,

    /// New York Times Article Search key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nytimes: Option<String>,

    /// News API (Event Registry) key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_api: Option<String>,
}

impl ApiKeys {
    /// Guardian key, falling back to `GUARDIAN_API_KEY`
    pub fn guardian(&self) -> Option<String> {
        key_or_env(&self.guardian, "GUARDIAN_API_KEY")
    }

    /// NYT key, falling back to `NYT_API_KEY`
    pub fn nytimes(&self) -> Option<String> {
        key_or_env(&self.nytimes, "NYT_API_KEY")
    }

    /// News API key, falling back to `NEWS_API_KEY`
    pub fn news_api(&self) -> Option<String> {
        key_or_env(&self.news_api, "NEWS_API_KEY")
    }
}

fn key_or_env(key: &Option<String>, var: &str) -> Option<String> {
    key.clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(var).ok())
        .filter(|k| !k.trim().is_empty())
}

/// Request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when a search does not request one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Per-request HTTP timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    30
}

/// Provider selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Provider ids that are never registered
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl SourcesConfig {
    /// Whether the provider with this id should be registered
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled.iter().any(|d| d.trim().eq_ignore_ascii_case(id))
    }
}

/// Feed preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Preferred provider name tokens
    #[serde(default)]
    pub sources: Vec<String>,

    /// Preferred category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level used when neither `RUST_LOG` nor `-v` says otherwise
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the first file found by
/// [`find_config_file`] is used, and running without any file is fine.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    match path {
        Some(path) => {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None => {
            if let Some(found) = find_config_file() {
                tracing::debug!("Using config file {}", found.display());
                builder = builder.add_source(config::File::from(found.as_path()).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sources.disabled")
                .with_list_parse_key("preferences.sources")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
