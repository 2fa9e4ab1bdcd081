//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/hearthcal/config.toml` by default:
//!
//! ```toml
//! [expansion]
//! max_occurrences = 100
//! horizon_months = 12
//!
//! [display]
//! week_starts_on = "sunday"
//! no_events_text = "No events"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hearthcal_core::{ConfigError, ConfigResult, ExpansionConfig, WeekStart};

/// Configuration for the hearthcal CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Expansion limits.
    pub expansion: ExpansionConfig,

    /// Display settings.
    pub display: DisplaySettings,
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// First day of the week for `view --view week|month`.
    pub week_starts_on: WeekStart,

    /// Text to show when there are no occurrences.
    pub no_events_text: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            week_starts_on: WeekStart::default(),
            no_events_text: "No events".to_string(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.expansion.validate()?;
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hearthcal")
    }
}
