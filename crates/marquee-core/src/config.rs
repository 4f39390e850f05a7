use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::MarqueeError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub trailer: TrailerConfig,
    pub embed: EmbedConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    pub backdrop_size: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerConfig {
    /// Video host a trailer must come from.
    pub site: String,
    /// Prefix the trailer key is appended to.
    pub watch_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub base_url: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub file_name: String,
}

impl AppConfig {
    /// Load config: user file (if exists) replaces the built-in defaults.
    pub fn load() -> Result<Self, MarqueeError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::parse(DEFAULT_CONFIG)
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, MarqueeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MarqueeError::Config(e.to_string()))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, MarqueeError> {
        toml::from_str(content).map_err(|e| MarqueeError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), MarqueeError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), MarqueeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, MarqueeError> {
        toml::to_string_pretty(self).map_err(|e| MarqueeError::Config(e.to_string()))
    }

    /// The TMDb API key, with the environment variable taking precedence.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.tmdb.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "marquee")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
