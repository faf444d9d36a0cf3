//! # Config
//!
//! The handful of settings that survive a restart: the theme name and the
//! grid row density. They live in `config.json` under the platform config
//! directory (`~/.config/reqscope/` on Linux, resolved through the
//! `directories` crate) and are written back once when the app exits.
//!
//! A missing file means defaults. A file that fails to parse also means
//! defaults, but with a warning on stderr so a typo in a hand-edited
//! config does not silently vanish.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "config.json";

/// Settings persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in theme name; unknown names fall back to the default theme
    /// at startup.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Spacious two-line grid rows.
    #[serde(default)]
    pub large_rows: bool,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            large_rows: false,
        }
    }
}

impl Config {
    /// Read the config, falling back to defaults. Only called before the
    /// TUI starts, so the parse warning can go to stderr.
    pub fn load() -> Self {
        let result = Self::path().and_then(|path| Self::load_from(&path));
        match result {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// Read the config from `path`. A missing file is defaults, not an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the config to its platform location.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Write the config to `path`, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    fn path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "reqscope")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join(FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme, "Catppuccin Mocha");
        assert!(!config.large_rows);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.theme, Config::default().theme);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);

        fs::write(&path, r#"{"theme": "Nord"}"#).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, "Nord");
        assert!(!loaded.large_rows);

        fs::write(&path, "{}").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, "Catppuccin Mocha");
    }

    #[test]
    fn test_save_creates_directories_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join(FILE_NAME);

        let config = Config {
            theme: "Dracula".to_string(),
            large_rows: true,
        };
        config.save_to(&path).unwrap();

        assert!(path.exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme, "Dracula");
        assert!(loaded.large_rows);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, r#"{"theme": "Nord", "font_size": 14}"#).unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
