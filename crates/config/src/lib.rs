pub mod schema;

pub use schema::{Corner, FrameSource, OverlayConfig, ThemeConfig, WatchConfig};

use fw_core::{Result, WatchError};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `WatchConfig::default()` if
/// the file doesn't exist so the overlay always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(WatchConfig::default());
    }

    let raw = std::fs::read_to_string(path)?;
    let config = parse(&raw)?;
    tracing::info!("Loaded config from '{}'", path.display());
    Ok(config)
}

/// Parse a TOML document; missing sections and keys fall back to defaults.
pub fn parse(raw: &str) -> Result<WatchConfig> {
    toml::from_str(raw).map_err(|e| WatchError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("framewatch").join("framewatch.toml")
}
