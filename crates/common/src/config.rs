//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ScrolldirError, ScrolldirResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Default watcher settings.
    pub watcher: WatcherDefaults,

    /// Defaults used when replaying or synthesizing traces.
    pub replay: ReplayDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default watcher parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherDefaults {
    /// Name of the attribute receiving `down`, `up` or `off`.
    pub flag_name: String,

    /// Direction assumed before the first reversal ("down" or "up").
    pub initial_direction: String,

    /// Age after which the pivot is considered stale (ms).
    pub history_max_age_ms: f64,

    /// Moves back from the pivot smaller than this are ignored (px).
    pub threshold_px: f64,
}

/// Default simulated page geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayDefaults {
    /// Viewport (window inner) height in CSS pixels.
    pub viewport_height: f64,

    /// Document height in CSS pixels.
    pub document_height: f64,

    /// Frame rate used to synthesize frame callbacks (Hz).
    pub frame_rate_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "scrolldir_watcher=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for WatcherDefaults {
    fn default() -> Self {
        Self {
            flag_name: "data-scrolldir".to_string(),
            initial_direction: "down".to_string(),
            history_max_age_ms: 512.0,
            threshold_px: 64.0,
        }
    }
}

impl Default for ReplayDefaults {
    fn default() -> Self {
        Self {
            viewport_height: 800.0,
            document_height: 2800.0,
            frame_rate_hz: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the watcher and replay engine cannot work with.
    pub fn validate(&self) -> ScrolldirResult<()> {
        let w = &self.watcher;
        if w.flag_name.trim().is_empty() {
            return Err(ScrolldirError::config("watcher.flag_name must not be empty"));
        }
        if !(w.history_max_age_ms.is_finite() && w.history_max_age_ms >= 0.0) {
            return Err(ScrolldirError::config(format!(
                "watcher.history_max_age_ms must be a non-negative number, got {}",
                w.history_max_age_ms
            )));
        }
        if !(w.threshold_px.is_finite() && w.threshold_px >= 0.0) {
            return Err(ScrolldirError::config(format!(
                "watcher.threshold_px must be a non-negative number, got {}",
                w.threshold_px
            )));
        }
        let r = &self.replay;
        if !(r.viewport_height > 0.0 && r.document_height > 0.0) {
            return Err(ScrolldirError::config(
                "replay viewport and document heights must be positive",
            ));
        }
        if r.frame_rate_hz == 0 {
            return Err(ScrolldirError::config("replay.frame_rate_hz must be non-zero"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("scrolldir").join("config.json")
}
