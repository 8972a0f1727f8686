//! Client-local persistence of theme settings

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::{ColorPreset, ThemeMode, ThemeSettings};
use crate::error::Result;

pub trait ThemeStore: Send {
    /// Stored settings; unknown or missing values fall back to defaults
    fn load(&self) -> Result<ThemeSettings>;
    fn save(&self, settings: &ThemeSettings) -> Result<()>;
}

/// On-disk form. Values stay strings so a bad entry degrades to the default
/// instead of failing the whole file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    theme_mode: Option<String>,
    #[serde(default)]
    theme_color: Option<String>,
}

impl ThemeFile {
    fn into_settings(self) -> ThemeSettings {
        let mode = self
            .theme_mode
            .and_then(|m| m.parse::<ThemeMode>().ok())
            .unwrap_or_default();
        let color = self
            .theme_color
            .and_then(|c| c.parse::<ColorPreset>().ok())
            .unwrap_or_default();
        ThemeSettings { mode, color }
    }
}

/// `theme.toml` in the config directory
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("theme.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<ThemeSettings> {
        if !self.path.exists() {
            return Ok(ThemeSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: ThemeFile = toml::from_str(&content)?;
        Ok(file.into_settings())
    }

    fn save(&self, settings: &ThemeSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ThemeFile {
            theme_mode: Some(settings.mode.to_string()),
            theme_color: Some(settings.color.to_string()),
        };
        std::fs::write(&self.path, toml::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// In-memory store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    saved: Arc<Mutex<Option<ThemeSettings>>>,
}

impl MemoryThemeStore {
    pub fn with(settings: ThemeSettings) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Some(settings))),
        }
    }

    pub fn saved(&self) -> Option<ThemeSettings> {
        self.saved.lock().ok().and_then(|s| *s)
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<ThemeSettings> {
        Ok(self.saved().unwrap_or_default())
    }

    fn save(&self, settings: &ThemeSettings) -> Result<()> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(*settings);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileThemeStore::in_dir(temp_dir.path());
        assert_eq!(store.load()?, ThemeSettings::default());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileThemeStore::in_dir(&temp_dir.path().join("folio"));
        let settings = ThemeSettings::new(ThemeMode::Auto, ColorPreset::Orange);

        store.save(&settings)?;

        assert_eq!(store.load()?, settings);
        let raw = std::fs::read_to_string(store.path())?;
        assert!(raw.contains("theme_mode = \"auto\""));
        assert!(raw.contains("theme_color = \"orange\""));
        Ok(())
    }

    #[test]
    fn test_unknown_values_fall_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = FileThemeStore::in_dir(temp_dir.path());
        std::fs::write(store.path(), "theme_mode = \"sepia\"\ntheme_color = \"purple\"\n")?;

        let settings = store.load()?;
        assert_eq!(settings.mode, ThemeMode::Light);
        assert_eq!(settings.color, ColorPreset::Purple);
        Ok(())
    }

    #[test]
    fn test_memory_store_shared_between_clones() -> Result<()> {
        let store = MemoryThemeStore::default();
        let other = store.clone();
        store.save(&ThemeSettings::new(ThemeMode::Dark, ColorPreset::Red))?;
        assert_eq!(other.load()?.color, ColorPreset::Red);
        Ok(())
    }
}
