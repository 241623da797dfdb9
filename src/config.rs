//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_INITIAL_PAGE, DEFAULT_MAX_DISPLAY_LEN, DEFAULT_PENDING_TIMEOUT, DEFAULT_PROMPT,
};
use crate::models::KeyLayout;

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Passphrase keyboard behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Prompt shown while nothing has been typed
    pub prompt: String,
    /// Page shown when the screen opens
    pub initial_page: usize,
    /// Milliseconds a multi-tap character stays open for cycling
    pub pending_timeout_ms: u64,
    /// Characters of the typed text shown before it scrolls
    pub max_display_len: usize,
    /// Custom keyboard layout file (TOML); the standard layout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_file: Option<PathBuf>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            initial_page: DEFAULT_INITIAL_PAGE,
            pending_timeout_ms: DEFAULT_PENDING_TIMEOUT.as_millis() as u64,
            max_display_len: DEFAULT_MAX_DISPLAY_LEN,
            layout_file: None,
        }
    }
}

impl KeyboardConfig {
    /// Loads the configured layout, or the standard one.
    pub fn load_layout(&self) -> Result<KeyLayout> {
        match &self.layout_file {
            Some(path) => KeyLayout::load(path),
            None => Ok(KeyLayout::standard()),
        }
    }
}

/// User interface preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme mode preference (Auto/Dark/Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Diagnostic log settings.
///
/// The terminal belongs to the keyboard screen, so logs go to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to write a log file at all
    pub enabled: bool,
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Log file path; `<config dir>/passpad.log` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Resolved log file path.
    pub fn file_path(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_dir()?.join("passpad.log")),
        }
    }
}

/// Application configuration.
///
/// Persisted to:
/// - Linux: `~/.config/Passpad/config.toml`
/// - macOS: `~/Library/Application Support/Passpad/config.toml`
/// - Windows: `%APPDATA%\Passpad\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Keyboard behaviour
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Passpad");

        Ok(config_dir)
    }

    /// Gets the full path to the configuration file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default location.
    ///
    /// Returns defaults when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `config_path`, or defaults when it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `config_path` using a temp file and rename.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.keyboard.pending_timeout_ms == 0 {
            anyhow::bail!("keyboard.pending_timeout_ms must be greater than zero");
        }

        if self.keyboard.max_display_len == 0 {
            anyhow::bail!("keyboard.max_display_len must be greater than zero");
        }

        if let Some(layout_file) = &self.keyboard.layout_file {
            if !layout_file.exists() {
                anyhow::bail!("Layout file does not exist: {}", layout_file.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.keyboard.prompt, "Enter passphrase");
        assert_eq!(config.keyboard.initial_page, 1);
        assert_eq!(config.keyboard.pending_timeout_ms, 1000);
        assert_eq!(config.keyboard.max_display_len, 14);
        assert_eq!(config.keyboard.layout_file, None);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert!(config.logging.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validate() {
        assert!(Config::new().validate().is_ok());

        let mut config = Config::new();
        config.keyboard.pending_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.keyboard.max_display_len = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.keyboard.layout_file = Some(PathBuf::from("/nonexistent/layout.toml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.keyboard.prompt = "Passphrase".to_string();
        config.keyboard.pending_timeout_ms = 750;
        config.ui.theme_mode = ThemeMode::Light;

        config.save_to(&config_file).unwrap();
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[keyboard]\ninitial_page = 0\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.keyboard.initial_page, 0);
        assert_eq!(loaded.keyboard.pending_timeout_ms, 1000);
        assert_eq!(loaded.ui.theme_mode, ThemeMode::Auto);
    }

    #[test]
    fn test_config_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[keyboard]\npending_timeout_ms = 0\n").unwrap();

        assert!(Config::load_from(&config_file).is_err());
    }

    #[test]
    fn test_load_layout_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let layout_file = temp_dir.path().join("layout.toml");
        fs::write(
            &layout_file,
            r#"pages = [["a", "b", "c", "d", "e", "f", "g", "h", "i", "xyz"]]"#,
        )
        .unwrap();

        let mut config = KeyboardConfig::default();
        assert_eq!(config.load_layout().unwrap(), KeyLayout::standard());

        config.layout_file = Some(layout_file);
        let layout = config.load_layout().unwrap();
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn test_logging_file_path_override() {
        let logging = LoggingConfig {
            file: Some(PathBuf::from("/tmp/passpad-test.log")),
            ..LoggingConfig::default()
        };
        assert_eq!(
            logging.file_path().unwrap(),
            PathBuf::from("/tmp/passpad-test.log")
        );
    }
}
