//! Configuration file support for news-aggregator.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api_keys]
//! guardian = "your-guardian-key"
//! nytimes = "your-nyt-key"
//! news_api = "your-event-registry-key"
//!
//! [search]
//! default_page_size = 10
//! request_timeout_secs = 30
//!
//! [sources]
//! disabled = ["newsapi"]
//!
//! [preferences]
//! sources = ["guardian", "new york times"]
//! category = "Technology"
//!
//! [logging]
//! level = "warn"
//! format = "text"
//! ```

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "news-aggregator.toml";

/// `<config_dir>/news-aggregator/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("news-aggregator").join("config.toml"))
}

/// First existing configuration file: the working directory, then the user
/// config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|p| p.is_file())
}

impl Config {
    /// Read a TOML file without environment overrides
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api_keys.nytimes = Some("saved-key".to_string());
        config.search.default_page_size = 20;
        config.preferences.category = Some(Category::Health);
        config.sources.disabled = vec!["guardian".to_string()];

        config.save(&path).unwrap();

        let loaded = Config::load_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_file_omits_unset_keys() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains("[search]"));
        assert!(!rendered.contains("guardian ="));
    }

    #[test]
    fn test_config_file_nonexistent() {
        let result = Config::load_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = Config::load_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
