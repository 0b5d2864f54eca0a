use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    errors::Result,
    ledger::AttendanceSnapshot,
    utils::{
        fs::{ensure_dir, write_atomic},
        paths,
    },
};

use super::SnapshotStore;

const BACKUP_EXTENSION: &str = "bak";

/// Stores the snapshot as pretty-printed JSON, keeping the previous save as a `.bak` copy.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Storage rooted at `base` (`<base>/data/attendance.json`), or the application data
    /// directory when `base` is `None`.
    pub fn new(base: Option<PathBuf>) -> Result<Self> {
        let base = base.unwrap_or_else(paths::app_data_dir);
        Self::at_path(paths::snapshot_file_in(&base))
    }

    /// Storage writing to an explicit file.
    pub fn at_path(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut backup = self.path.clone();
        let ext = match self.path.extension().and_then(|ext| ext.to_str()) {
            Some(existing) => format!("{}.{}", existing, BACKUP_EXTENSION),
            None => BACKUP_EXTENSION.to_string(),
        };
        backup.set_extension(ext);
        backup
    }

    fn backup_existing_file(&self) -> Result<()> {
        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }
        Ok(())
    }
}

impl SnapshotStore for JsonStorage {
    fn load(&self) -> Result<Option<AttendanceSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_snapshot_from_path(&self.path).map(Some)
    }

    fn save(&self, snapshot: &AttendanceSnapshot) -> Result<()> {
        self.backup_existing_file()?;
        save_snapshot_to_path(snapshot, &self.path)?;
        debug!(path = %self.path.display(), "attendance snapshot saved");
        Ok(())
    }
}

pub fn save_snapshot_to_path(snapshot: &AttendanceSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_snapshot_from_path(path: &Path) -> Result<AttendanceSnapshot> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
