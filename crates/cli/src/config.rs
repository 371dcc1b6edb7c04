//! Configuration for chamois
//!
//! A small TOML file at `~/.config/chamois/config.toml`; a missing file
//! means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::diffview::DiffLayout;
use chamois_core::FilterMode;

/// User configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the chezmoi binary; default resolves PATH
    pub bin: Option<PathBuf>,

    /// Initial list filter
    pub filter: FilterMode,

    /// Initial diff layout
    pub layout: DiffLayout,
}

impl Config {
    /// Default config file location: `$XDG_CONFIG_HOME/chamois/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chamois").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist and parse; the default path is
    /// optional and silently falls back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match Self::default_path() {
                Some(default) if default.exists() => default,
                _ => return Ok(Self::default()),
            },
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.bin.is_none());
        assert_eq!(config.filter, FilterMode::Modified);
        assert_eq!(config.layout, DiffLayout::SideBySide);
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
bin = "/opt/homebrew/bin/chezmoi"
filter = "all"
layout = "unified"
"#,
        )
        .unwrap();
        assert_eq!(config.bin.unwrap(), PathBuf::from("/opt/homebrew/bin/chezmoi"));
        assert_eq!(config.filter, FilterMode::All);
        assert_eq!(config.layout, DiffLayout::Unified);
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "filter = \"clean\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.filter, FilterMode::Clean);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nope.toml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
