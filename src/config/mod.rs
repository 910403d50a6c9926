//! Application configuration.
//!
//! Settings live in `config.json` inside the data directory. Every field
//! has a default, so a missing file or a partial file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FOCUSPLAN_DATA_DIR";

fn default_sound_enabled() -> bool {
    true
}

fn default_volume() -> f32 {
    0.7
}

fn default_tick_interval_ms() -> u64 {
    100
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Sound cue settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoundConfig {
    /// Whether interval and session cues are played.
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,

    /// Playback volume, 0.0-1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: default_sound_enabled(),
            volume: default_volume(),
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```
/// use focusplan::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert!(config.sound.enabled);
/// assert_eq!(config.tick_interval_ms, 100);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub sound: SoundConfig,

    /// Period of the session tick loop in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sound: SoundConfig::default(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Loads `config.json` from `data_dir`, falling back to defaults when
    /// the file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config: Self =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sound.volume) {
            return Err(ConfigError::Invalid(format!(
                "sound.volume must be between 0.0 and 1.0, got {}",
                self.sound.volume
            )));
        }
        if !(10..=1000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "tickIntervalMs must be between 10 and 1000, got {}",
                self.tick_interval_ms
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Platform data directory for the application.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("focusplan")
}

/// Picks the explicit directory if one was given, else the platform default.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(default_data_dir)
}
