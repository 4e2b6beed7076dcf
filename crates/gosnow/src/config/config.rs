//! Configuration management for gosnow.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{PollingConfig, ReplayConfig, StorageConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use gosnow_core::ControllerOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Recorder polling intervals.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Session history storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// GPX replay location feed.
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `config_path`, creating a default file there
    /// if it does not exist.
    ///
    /// Note: This does NOT check that a configured GPX file exists. Call
    /// `validate()` before wiring the app so a missing track is reported
    /// with the config path that named it.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        if config_path.exists() {
            let contents =
                fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
                    reason: format!("Failed to read config: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Check values the controller and replay depend on.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        if self.polling.active_interval_ms == 0 || self.polling.idle_interval_ms == 0 {
            return Err(invalid(
                "Polling intervals must be greater than zero".to_string(),
            ));
        }

        if self.storage.max_sessions == 0 {
            return Err(invalid("max_sessions must be at least 1".to_string()));
        }

        if !self.replay.speedup.is_finite() || self.replay.speedup < 1.0 {
            return Err(invalid(format!(
                "Replay speedup must be at least 1.0, got {}",
                self.replay.speedup
            )));
        }

        if let Some(gpx_path) = &self.replay.gpx_path
            && !gpx_path.exists()
        {
            return Err(invalid(format!("GPX track not found at: {:?}", gpx_path)));
        }

        Ok(())
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(config_dir) = config_path.parent()
            && !config_dir.exists()
        {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Directory holding the session history.
    #[track_caller]
    pub fn data_dir(&self) -> AppResult<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Directory for rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_local_dir().join("logs"))
    }

    /// Controller tuning derived from this configuration.
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            cadence: self.polling.cadence(),
            max_sessions: self.storage.max_sessions,
        }
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "gosnow", "GoSnow").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
