//! Configuration Management
//!
//! Handles persistent configuration storage for lenscraft.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "lenscraft";
pub const DEFAULT_API_BASE_URL: &str = "https://admin.ashaa.xyz/api";
pub const API_URL_ENV: &str = "LENSCRAFT_API_URL";

/// Toast and history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// minimal | detailed | verbose
    #[serde(default = "default_detail_level")]
    pub detail_level: String,
    #[serde(default = "default_toast_duration")]
    pub toast_duration_secs: u64,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_detail_level() -> String {
    "detailed".to_string()
}

fn default_toast_duration() -> u64 {
    5
}

fn default_max_history() -> usize {
    50
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            detail_level: default_detail_level(),
            toast_duration_secs: default_toast_duration(),
            max_history: default_max_history(),
        }
    }
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Studio backend base URL
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Bearer token sent with every request when set
    #[serde(default)]
    pub api_token: Option<String>,
    /// Operator login
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Last viewed page
    #[serde(default)]
    pub last_page: Option<String>,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Directory holding config, session and log files
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk; missing or corrupt files give defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the given file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Get effective API base URL (CLI > env > config > default)
    pub fn effective_api_url(&self, cli: Option<&str>) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(cli, env.as_deref(), self.api_base_url.as_deref())
    }

    /// Configured credentials, if both halves are present
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.clone(), pass.clone()))
            },
            _ => None,
        }
    }

    /// Token with blanks treated as unset
    pub fn effective_token(&self) -> Option<String> {
        self.api_token
            .as_ref()
            .filter(|t| !t.trim().is_empty())
            .cloned()
    }
}

fn resolve_api_url(cli: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    [cli, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_precedence() {
        assert_eq!(
            resolve_api_url(Some("http://cli"), Some("http://env"), Some("http://cfg")),
            "http://cli"
        );
        assert_eq!(
            resolve_api_url(None, Some("http://env"), Some("http://cfg")),
            "http://env"
        );
        assert_eq!(resolve_api_url(None, Some(" "), Some("http://cfg")), "http://cfg");
        assert_eq!(resolve_api_url(None, None, None), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            username: Some("anindo".to_string()),
            password: Some("secret".to_string()),
            last_page: Some("bookings".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.last_page.as_deref(), Some("bookings"));
        assert_eq!(
            loaded.credentials(),
            Some(("anindo".to_string(), "secret".to_string()))
        );
        assert_eq!(loaded.notifications.toast_duration_secs, 5);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = Config::load_from(&path);
        assert!(loaded.api_base_url.is_none());
        assert!(loaded.credentials().is_none());
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = Config {
            username: Some("anindo".to_string()),
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_blank_token_is_unset() {
        let config = Config {
            api_token: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.effective_token().is_none());
    }
}
