pub mod json_backend;

use std::{collections::HashSet, sync::Mutex};

use chrono::NaiveDate;
use tracing::warn;

use crate::{
    errors::{AttendanceError, Result},
    ledger::{AttendanceSnapshot, AttendanceState},
};

pub use json_backend::JsonStorage;

/// Abstraction over persistence backends holding the single attendance snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AttendanceSnapshot>>;
    /// Replaces the stored snapshot wholesale.
    fn save(&self, snapshot: &AttendanceSnapshot) -> Result<()>;
}

/// Loads persisted state, falling back to `defaults` when the snapshot is missing or unreadable.
pub fn load_or_default(store: &dyn SnapshotStore, defaults: AttendanceState) -> AttendanceState {
    match store.load() {
        Ok(Some(snapshot)) => AttendanceState::from_snapshot(snapshot, &defaults),
        Ok(None) => defaults,
        Err(err) => {
            warn!(error = %err, "could not load attendance snapshot, using defaults");
            defaults
        }
    }
}

/// Convenience wrapper over [`load_or_default`] using the built-in defaults for `today`.
pub fn load_state(store: &dyn SnapshotStore, today: NaiveDate) -> AttendanceState {
    load_or_default(store, AttendanceState::with_defaults(today))
}

/// Detects dangling references within a state snapshot.
pub fn state_warnings(state: &AttendanceState) -> Vec<String> {
    let subject_ids: HashSet<_> = state.subjects.iter().map(|s| s.id).collect();
    let mut warnings = Vec::new();
    for holiday in state.holidays.iter() {
        for (subject_id, hours) in holiday.cancelled_hours.iter() {
            if !subject_ids.contains(&subject_id) {
                warnings.push(format!(
                    "holiday `{}` cancels {} hrs of removed subject {}",
                    holiday.name, hours, subject_id
                ));
            }
        }
    }
    warnings
}

/// In-process store, used where nothing should touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw JSON, e.g. to simulate a corrupt save.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(json.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SnapshotStore for MemoryStorage {
    fn load(&self) -> Result<Option<AttendanceSnapshot>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| AttendanceError::Storage("memory store poisoned".into()))?;
        match guard.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &AttendanceSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| AttendanceError::Storage("memory store poisoned".into()))?;
        *guard = Some(json);
        Ok(())
    }
}
