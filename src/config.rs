//! Client configuration
//!
//! Loaded from `config.toml` in the folio config directory. A missing file
//! means defaults; `FOLIO_API_URL` overrides the backend address.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const APP_DIR: &str = "folio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin; endpoints live under `/api`
    pub api_url: String,
    pub default_uid: String,
    pub search_limit: u32,
    pub recommend_k: u32,
    pub toast_duration_ms: u64,
    /// How often the OS light/dark preference is re-read
    pub appearance_poll_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            default_uid: "u123".to_string(),
            search_limit: 12,
            recommend_k: 12,
            toast_duration_ms: 1800,
            appearance_poll_secs: 2,
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let mut config = Self::load_from(&path)?;
        config.override_api_url(std::env::var("FOLIO_API_URL").ok())?;
        Ok(config)
    }

    /// Replace `api_url` with a non-blank override, then re-validate
    pub fn override_api_url(&mut self, url: Option<String>) -> Result<()> {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
            self.validate()?;
        }
        Ok(())
    }

    /// Write a default `config.toml` at `path`; an existing file is left alone
    pub fn init_at(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(Error::Config(format!("{} already exists", path.display())));
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("FOLIO_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        Ok(config_dir()?.join("config.toml"))
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn appearance_poll_interval(&self) -> Duration {
        Duration::from_secs(self.appearance_poll_secs.max(1))
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        Ok(())
    }
}

/// Per-user directory holding `config.toml` and `theme.toml`
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(format!(".{}", APP_DIR)));
    }

    Err(Error::Config(
        "Could not determine config directory: no HOME or XDG config directory found".to_string(),
    ))
}
