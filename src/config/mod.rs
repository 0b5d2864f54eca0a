//! Persistent user preferences.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::notifier::DEFAULT_DEFICIT_FLOOR,
    errors::{AttendanceError, Result},
    ledger::{is_valid_threshold, DEFAULT_MIN_ATTENDANCE, DEFAULT_TERM_WEEKS, MAX_TERM_WEEKS},
    utils::{
        fs::{ensure_dir, write_atomic},
        paths,
    },
};

/// Stores user-configurable defaults and CLI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Threshold applied when no snapshot exists yet.
    #[serde(default = "Config::default_min_attendance")]
    pub default_min_attendance: f64,
    #[serde(default = "Config::default_term_weeks")]
    pub default_term_weeks: u32,
    /// Percentage points below the threshold before a low-attendance alert fires.
    #[serde(default = "Config::default_alert_deficit_floor")]
    pub alert_deficit_floor: f64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom location for the attendance snapshot. Defaults to the application data dir.
    pub data_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Custom location for exported reports. Defaults to `<data dir>/exports`.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_min_attendance: Self::default_min_attendance(),
            default_term_weeks: Self::default_term_weeks(),
            alert_deficit_floor: Self::default_alert_deficit_floor(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn default_min_attendance() -> f64 {
        DEFAULT_MIN_ATTENDANCE
    }

    pub fn default_term_weeks() -> u32 {
        DEFAULT_TERM_WEEKS
    }

    pub fn default_alert_deficit_floor() -> f64 {
        DEFAULT_DEFICIT_FLOOR
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_threshold(self.default_min_attendance) {
            return Err(AttendanceError::Config(format!(
                "default_min_attendance must be within 0-100, got {}",
                self.default_min_attendance
            )));
        }
        if !(1..=MAX_TERM_WEEKS).contains(&self.default_term_weeks) {
            return Err(AttendanceError::Config(format!(
                "default_term_weeks must be within 1-{}, got {}",
                MAX_TERM_WEEKS, self.default_term_weeks
            )));
        }
        if !self.alert_deficit_floor.is_finite() || self.alert_deficit_floor < 0.0 {
            return Err(AttendanceError::Config(format!(
                "alert_deficit_floor must be non-negative, got {}",
                self.alert_deficit_floor
            )));
        }
        Ok(())
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| base.to_path_buf())
    }

    pub fn resolve_export_dir(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| paths::export_dir_in(&self.resolve_data_dir(base)))
    }
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self> {
        let path = paths::config_file_in(base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self::new(path))
    }

    /// Loads the config file, returning defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config =
            serde_json::from_str(&data).map_err(|err| AttendanceError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| AttendanceError::Config(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
