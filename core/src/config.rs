//! Configuration management for Draft Desk

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DeskError, DeskResult};
use crate::lifecycle::DEFAULT_GENERATION_ERROR;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Inbox service settings
    pub backend: BackendConfig,
    /// Draft review settings
    pub drafting: DraftingConfig,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Debug mode
    pub debug: bool,
    /// Log level
    pub log_level: String,
    /// Configuration directory
    pub config_dir: PathBuf,
}

/// Inbox service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the inbox service
    pub base_url: String,
    /// Request timeout (seconds); draft generation can take a while
    pub request_timeout: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Draft review configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftingConfig {
    /// Banner text for generation failures that carry no detail
    pub fallback_error: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: crate::APP_NAME.to_string(),
            version: crate::VERSION.to_string(),
            debug: false,
            log_level: "info".to_string(),
            config_dir: crate::get_config_dir(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_API_BASE.to_string(),
            request_timeout: 120,
            user_agent: format!("draftdesk/{}", crate::VERSION),
        }
    }
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            fallback_error: DEFAULT_GENERATION_ERROR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(config_path: &Path) -> DeskResult<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Return default configuration
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &Path) -> DeskResult<()> {
        // Ensure directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|_| DeskError::ConfigDirCreateFailed(parent.to_path_buf()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(debug) = std::env::var("DRAFTDESK_DEBUG") {
            self.app.debug = debug == "1" || debug.to_lowercase() == "true";
        }

        if let Ok(log_level) = std::env::var("DRAFTDESK_LOG_LEVEL") {
            self.app.log_level = log_level;
        }

        if let Ok(config_dir) = std::env::var("DRAFTDESK_CONFIG_DIR") {
            self.app.config_dir = PathBuf::from(config_dir);
        }

        if let Ok(base_url) = std::env::var("DRAFTDESK_API_BASE") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("DRAFTDESK_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse() {
                self.backend.request_timeout = seconds;
            }
        }
    }

    /// Get the configuration file path
    pub fn config_file_path(&self) -> PathBuf {
        self.app.config_dir.join(crate::CONFIG_FILENAME)
    }

    /// Validate the configuration
    pub fn validate(&self) -> DeskResult<()> {
        url::Url::parse(&self.backend.base_url)
            .map_err(|e| DeskError::config(format!("Invalid backend URL {}: {}", self.backend.base_url, e)))?;

        if self.backend.request_timeout == 0 {
            return Err(DeskError::config("Request timeout cannot be zero"));
        }

        if self.drafting.fallback_error.trim().is_empty() {
            return Err(DeskError::config("Fallback error message cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.app.name, "Draft Desk");
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8001");
        assert_eq!(config.drafting.fallback_error, "Failed to generate draft.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.app.debug = true;
        config.backend.base_url = "https://desk.example.com/api".to_string();

        config.save(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded_config = Config::load(&config_path).unwrap();
        assert!(loaded_config.app.debug);
        assert_eq!(loaded_config.backend.base_url, "https://desk.example.com/api");
    }

    #[test]
    fn test_save_reports_unusable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = Config::default().save(&blocker.join("config.toml"));
        assert!(matches!(result, Err(DeskError::ConfigDirCreateFailed(path)) if path == blocker));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[backend]\nrequest_timeout = 30\n").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.backend.request_timeout, 30);
        assert_eq!(config.backend.base_url, crate::DEFAULT_API_BASE);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.backend.request_timeout, 120);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.backend.request_timeout = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backend.base_url = "::nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("DRAFTDESK_DEBUG", "true");
        std::env::set_var("DRAFTDESK_API_BASE", "http://10.0.0.5:9000");
        std::env::set_var("DRAFTDESK_REQUEST_TIMEOUT_SECONDS", "45");

        let config = Config::load_from_env();
        assert!(config.app.debug);
        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.request_timeout, 45);

        // Clean up
        std::env::remove_var("DRAFTDESK_DEBUG");
        std::env::remove_var("DRAFTDESK_API_BASE");
        std::env::remove_var("DRAFTDESK_REQUEST_TIMEOUT_SECONDS");
    }
}
