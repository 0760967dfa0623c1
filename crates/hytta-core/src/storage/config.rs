//! TOML-based application configuration.
//!
//! Stores the calendar feed URL, the night window for relaxed polling,
//! and the retry policy knobs.
//!
//! Configuration is stored at `~/.config/hytta/config.toml`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::sync::retry::RetryPolicy;

/// Calendar sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote feed returning upcoming events as JSON.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,
}

/// Night window during which polling relaxes to the night cadence.
/// Hours are UTC; the window may wrap past midnight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightConfig {
    #[serde(default = "default_night_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_night_end_hour")]
    pub end_hour: u32,
}

impl NightConfig {
    /// Whether `at` falls inside the night window.
    pub fn is_night(&self, at: DateTime<Utc>) -> bool {
        let hour = at.hour();
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hytta/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub night: NightConfig,
}

// Default functions
fn default_feed_url() -> String {
    "http://localhost:8787/events".to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_initial_backoff_secs() -> u64 {
    5
}
fn default_night_start_hour() -> u32 {
    22
}
fn default_night_end_hour() -> u32 {
    7
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            max_retries: default_max_retries(),
            initial_backoff_secs: default_initial_backoff_secs(),
        }
    }
}

impl Default for NightConfig {
    fn default() -> Self {
        Self {
            start_hour: default_night_start_hour(),
            end_hour: default_night_end_hour(),
        }
    }
}

impl Config {
    /// Path of the active config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::path()?)
    }

    /// Load from a specific path; a missing file yields defaults.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::path()?)
    }

    /// Save to a specific path.
    pub fn save_to(&self, path: PathBuf) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Retry policy from the configured knobs.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.sync.max_retries,
            initial_backoff_secs: self.sync.initial_backoff_secs,
        }
    }
}
