#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use attendance_core::{
    config::ConfigManager,
    core::{AttendanceTracker, FixedClock, TrackerDefaults},
    storage::JsonStorage,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and config managers backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager, PathBuf) {
    let base = temp_base_dir();
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(&base).expect("create config manager for temp dir");
    (storage, config_manager, base)
}

pub fn term_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Tracker over `storage` pinned to the start of the autumn term.
pub fn open_tracker(storage: JsonStorage) -> AttendanceTracker {
    AttendanceTracker::open_with_clock(
        Box::new(storage),
        TrackerDefaults::default(),
        Box::new(FixedClock(term_start())),
    )
}
