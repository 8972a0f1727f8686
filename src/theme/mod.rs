//! Display mode and color preset selection
//!
//! Pure data and resolution rules. Persistence lives in [`store`], change
//! notification in [`service`], OS preference detection in [`appearance`].

pub mod appearance;
pub mod service;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use service::ThemeService;
pub use store::{FileThemeStore, MemoryThemeStore, ThemeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "☀ Light",
            ThemeMode::Dark => "☾ Dark",
            ThemeMode::Auto => "✦ Auto",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "auto" => Ok(ThemeMode::Auto),
            other => Err(format!("Unknown theme mode: {}", other)),
        }
    }
}

/// Mode after `auto` has been resolved against the OS preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Light,
    Dark,
}

impl Resolved {
    pub fn is_dark(self) -> bool {
        self == Resolved::Dark
    }

    pub fn label(self) -> &'static str {
        match self {
            Resolved::Light => "Light",
            Resolved::Dark => "Dark",
        }
    }
}

/// `auto` follows the OS; `light` and `dark` ignore it.
pub fn resolve(mode: ThemeMode, os_prefers_dark: bool) -> Resolved {
    match mode {
        ThemeMode::Light => Resolved::Light,
        ThemeMode::Dark => Resolved::Dark,
        ThemeMode::Auto if os_prefers_dark => Resolved::Dark,
        ThemeMode::Auto => Resolved::Light,
    }
}

/// RGB triple; converted to the UI toolkit's color type at render time
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    #[default]
    Blue,
    Purple,
    Green,
    Orange,
    Red,
    Teal,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 6] = [
        ColorPreset::Blue,
        ColorPreset::Purple,
        ColorPreset::Green,
        ColorPreset::Orange,
        ColorPreset::Red,
        ColorPreset::Teal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorPreset::Blue => "blue",
            ColorPreset::Purple => "purple",
            ColorPreset::Green => "green",
            ColorPreset::Orange => "orange",
            ColorPreset::Red => "red",
            ColorPreset::Teal => "teal",
        }
    }

    pub fn primary(self) -> Rgb {
        match self {
            ColorPreset::Blue => (0x25, 0x63, 0xeb),
            ColorPreset::Purple => (0x7c, 0x3a, 0xed),
            ColorPreset::Green => (0x16, 0xa3, 0x4a),
            ColorPreset::Orange => (0xf5, 0x9e, 0x0b),
            ColorPreset::Red => (0xef, 0x44, 0x44),
            ColorPreset::Teal => (0x14, 0xb8, 0xa6),
        }
    }

    pub fn accent(self) -> Rgb {
        match self {
            ColorPreset::Blue => (0x06, 0xb6, 0xd4),
            ColorPreset::Purple => (0xec, 0x48, 0x99),
            ColorPreset::Green => (0x22, 0xc5, 0x5e),
            ColorPreset::Orange => (0xf9, 0x73, 0x16),
            ColorPreset::Red => (0xf4, 0x3f, 0x5e),
            ColorPreset::Teal => (0x06, 0xb6, 0xd4),
        }
    }
}

impl fmt::Display for ColorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ColorPreset::ALL
            .into_iter()
            .find(|preset| preset.as_str() == wanted)
            .ok_or_else(|| format!("Unknown theme color: {}", s.trim()))
    }
}

/// What the user picked; `auto` is kept unresolved here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub color: ColorPreset,
}

impl ThemeSettings {
    pub fn new(mode: ThemeMode, color: ColorPreset) -> Self {
        Self { mode, color }
    }
}

/// Settings plus their resolution; what listeners receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTheme {
    pub settings: ThemeSettings,
    pub resolved: Resolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_follows_os() {
        assert_eq!(resolve(ThemeMode::Auto, true), Resolved::Dark);
        assert_eq!(resolve(ThemeMode::Auto, false), Resolved::Light);
    }

    #[test]
    fn test_explicit_modes_ignore_os() {
        for os_dark in [true, false] {
            assert_eq!(resolve(ThemeMode::Light, os_dark), Resolved::Light);
            assert_eq!(resolve(ThemeMode::Dark, os_dark), Resolved::Dark);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" teal ".parse::<ColorPreset>(), Ok(ColorPreset::Teal));
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert!("pink".parse::<ColorPreset>().is_err());
    }

    #[test]
    fn test_six_distinct_presets() {
        let primaries: std::collections::HashSet<_> =
            ColorPreset::ALL.iter().map(|p| p.primary()).collect();
        assert_eq!(primaries.len(), 6);
        assert_eq!(ColorPreset::Blue.primary(), (0x25, 0x63, 0xeb));
    }

    #[test]
    fn test_defaults() {
        let settings = ThemeSettings::default();
        assert_eq!(settings.mode, ThemeMode::Light);
        assert_eq!(settings.color, ColorPreset::Blue);
    }
}
