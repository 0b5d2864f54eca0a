use dirs::home_dir;
use std::{env, path::PathBuf};

pub const HOME_ENV_VAR: &str = "ATTENDANCE_CORE_HOME";

const DEFAULT_DIR_NAME: &str = ".attendance_core";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";
const SNAPSHOT_FILE: &str = "attendance.json";
const EXPORT_DIR: &str = "exports";

/// Returns the application data directory, defaulting to `~/.attendance_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV_VAR) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

pub fn snapshot_file_in(base: &std::path::Path) -> PathBuf {
    base.join(DATA_DIR).join(SNAPSHOT_FILE)
}

pub fn export_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(EXPORT_DIR)
}
