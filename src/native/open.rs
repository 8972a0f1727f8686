//! Hand URLs to the system browser

use std::process::Command;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

/// Open `url` with the default application
pub fn open_url(url: &str) -> Result<(), String> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("Refusing to open non-http URL: {}", url));
    }

    Command::new(OPENER)
        .arg(url)
        .spawn()
        .map_err(|e| format!("Failed to open {}: {}", url, e))?;
    tracing::info!("Opened {}", url);
    Ok(())
}
