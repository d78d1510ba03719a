use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chordwheel_core::SessionConfig;

#[derive(serde::Serialize, serde::Deserialize, Default)]
pub(super) struct CliConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(serde::Serialize, serde::Deserialize, Default)]
pub(super) struct DisplayConfig {
    /// Print plain `#`/`b` symbols instead of music glyphs
    #[serde(default)]
    pub ascii: bool,
}

pub(super) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chordwheel")
        .join("config.toml")
}

/// Config from the default location; missing or broken files give defaults
pub(super) fn load_config() -> CliConfig {
    let path = config_path();
    let Ok(text) = std::fs::read_to_string(&path) else {
        return CliConfig::default();
    };
    toml::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
        CliConfig::default()
    })
}

/// Config from a path given on the command line; errors are reported
pub(super) fn load_config_from(path: &Path) -> Result<CliConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
