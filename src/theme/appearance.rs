//! System light/dark preference
//!
//! Queried through the desktop's own tooling; `FOLIO_COLOR_SCHEME` overrides.
//! Anything unrecognised counts as light.

use std::process::Command;

pub const ENV_OVERRIDE: &str = "FOLIO_COLOR_SCHEME";

pub fn prefers_dark() -> bool {
    if let Ok(value) = std::env::var(ENV_OVERRIDE) {
        if let Some(dark) = parse_override(&value) {
            return dark;
        }
    }
    query_platform().unwrap_or(false)
}

/// Async wrapper for use from UI subscriptions
pub async fn detect() -> bool {
    tokio::task::spawn_blocking(prefers_dark)
        .await
        .unwrap_or(false)
}

fn parse_override(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

#[cfg(target_os = "macos")]
fn query_platform() -> Option<bool> {
    // Key is absent entirely in light mode, which makes `defaults` exit non-zero
    let output = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    Some(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "Dark")
}

#[cfg(not(target_os = "macos"))]
fn query_platform() -> Option<bool> {
    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(parse_gnome_color_scheme(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg_attr(target_os = "macos", allow(dead_code))]
fn parse_gnome_color_scheme(value: &str) -> bool {
    value.trim().trim_matches('\'').eq_ignore_ascii_case("prefer-dark")
}
