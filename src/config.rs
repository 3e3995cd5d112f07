use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Language;

pub const DEFAULT_API_BASE_URL: &str = "https://www.vancoillieithulp.be/news/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Persisted user settings. Unknown or missing values fall back to
/// defaults so a config written by any app version keeps loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,

    #[serde(default = "default_notification_hour")]
    pub notification_hour: u8,

    #[serde(default)]
    pub notification_minute: u8,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_notification_hour() -> u8 {
    9
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newsdesk")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            theme: Theme::default(),
            notifications_enabled: default_notifications_enabled(),
            notification_hour: default_notification_hour(),
            notification_minute: 0,
            api_base_url: default_api_base_url(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize config to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        // Environment variables override config file values
        if let Ok(url) = std::env::var("NEWSDESK_API_URL") {
            config.api_base_url = url;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsdesk")
            .join("config.toml")
    }
}
