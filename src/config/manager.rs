//! Configuration manager for loading page configuration
//!
//! Reads `$FOLIOSYNC_CONFIG` (or `./foliosync.json`). Configuration is never
//! written back; a missing or corrupt file yields the built-in defaults.

use crate::config::models::PageConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the configuration path
pub const CONFIG_ENV_VAR: &str = "FOLIOSYNC_CONFIG";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    ///
    /// Returns: `$FOLIOSYNC_CONFIG`, or `foliosync.json` in the working directory
    pub fn get_config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map_or_else(|| PathBuf::from("foliosync.json"), PathBuf::from)
    }

    /// Load configuration from the default location
    pub fn load() -> Result<PageConfig> {
        Self::load_from(&Self::get_config_path())
    }

    /// Load configuration from `path`
    ///
    /// If the file doesn't exist or is corrupt, returns the default configuration.
    /// Read failures other than a missing file are returned.
    pub fn load_from(path: &Path) -> Result<PageConfig> {
        if !path.exists() {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(PageConfig::default());
        }

        let json = std::fs::read_to_string(path)?;

        match serde_json::from_str::<PageConfig>(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                Ok(config.sanitized())
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(PageConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_config_path_default_name() {
        let path = ConfigManager::get_config_path();
        if std::env::var_os(CONFIG_ENV_VAR).is_none() {
            assert_eq!(path, PathBuf::from("foliosync.json"));
        }
    }

    #[test]
    fn test_load_missing_config() {
        let dir = create_test_dir();
        let config = ConfigManager::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_load_corrupt_config_falls_back() {
        let dir = create_test_dir();
        let path = dir.path().join("foliosync.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = ConfigManager::load_from(&path).unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_load_custom_config_is_sanitized() {
        let dir = create_test_dir();
        let path = dir.path().join("foliosync.json");
        std::fs::write(
            &path,
            r#"{
                "sections": [{ "id": "a" }, { "id": "b" }, { "id": "a" }],
                "testimonials": [{
                    "quote": "q", "name": "n", "role": "r", "company": "c",
                    "rating": 7, "avatar_url": "u"
                }],
                "timing": { "carousel_interval_ms": 3000 }
            }"#,
        )
        .unwrap();

        let config = ConfigManager::load_from(&path).unwrap();
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.testimonials[0].rating, 5);
        assert_eq!(config.timing.carousel_interval_ms, 3000);
        assert_eq!(config.timing.counter_duration_ms, 2000);
    }
}
