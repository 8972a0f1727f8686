//! Theme state owned by the UI composition root

use super::{resolve, AppliedTheme, ColorPreset, Resolved, ThemeMode, ThemeSettings, ThemeStore};

type Listener = Box<dyn Fn(&AppliedTheme) + Send>;

pub struct ThemeService {
    store: Box<dyn ThemeStore>,
    settings: ThemeSettings,
    os_prefers_dark: bool,
    listeners: Vec<Listener>,
}

impl ThemeService {
    /// Load persisted settings. A failing store logs and falls back to defaults.
    pub fn new(store: Box<dyn ThemeStore>, os_prefers_dark: bool) -> Self {
        let settings = match store.load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Could not read theme settings: {}", e);
                ThemeSettings::default()
            }
        };
        tracing::debug!("Theme loaded: mode={} color={}", settings.mode, settings.color);

        Self {
            store,
            settings,
            os_prefers_dark,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> AppliedTheme {
        AppliedTheme {
            settings: self.settings,
            resolved: self.resolved(),
        }
    }

    pub fn resolved(&self) -> Resolved {
        resolve(self.settings.mode, self.os_prefers_dark)
    }

    /// Register a callback fired after every effective change
    pub fn subscribe(&mut self, listener: impl Fn(&AppliedTheme) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Persist and apply new settings
    pub fn set(&mut self, mode: ThemeMode, color: ColorPreset) {
        let next = ThemeSettings::new(mode, color);
        if next == self.settings {
            return;
        }
        self.settings = next;

        if let Err(e) = self.store.save(&next) {
            tracing::error!("Failed to persist theme settings: {}", e);
        }
        tracing::info!("Theme set: mode={} color={}", mode, color);
        self.notify();
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.set(mode, self.settings.color);
    }

    pub fn set_color(&mut self, color: ColorPreset) {
        self.set(self.settings.mode, color);
    }

    /// Flip whatever is currently shown, pinning an explicit mode
    pub fn toggle(&mut self) {
        let mode = if self.resolved().is_dark() {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        };
        self.set_mode(mode);
    }

    pub fn reset(&mut self) {
        let defaults = ThemeSettings::default();
        self.set(defaults.mode, defaults.color);
    }

    /// Record the OS preference; listeners hear about it only if `auto` flips
    pub fn set_os_dark(&mut self, os_prefers_dark: bool) {
        if os_prefers_dark == self.os_prefers_dark {
            return;
        }
        let before = self.resolved();
        self.os_prefers_dark = os_prefers_dark;

        if self.resolved() != before {
            tracing::info!("System appearance changed, now {}", self.resolved().label());
            self.notify();
        }
    }

    fn notify(&self) {
        let applied = self.get();
        for listener in &self.listeners {
            listener(&applied);
        }
    }
}

impl std::fmt::Debug for ThemeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeService")
            .field("settings", &self.settings)
            .field("os_prefers_dark", &self.os_prefers_dark)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
