//! The top-level controller: owns the attendance state, the session notifier and the snapshot
//! store, and maps each user action onto a single ledger or engine operation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    core::{
        accounting::{AccountingService, AggregateFigures, SubjectFigures},
        clock::{Clock, SystemClock},
        notifier::{Notification, ThresholdNotifier},
        report::{report_header, report_rows, ReportHeader, ReportRow},
    },
    errors::Result,
    export::{write_export, ExportKind},
    ledger::{is_valid_threshold, AttendanceState, CancelledHours, Holiday, Subject, TermWindow},
    storage::{load_or_default, SnapshotStore},
};

/// Yes/no gate consulted before destructive actions.
pub trait ConfirmationGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Defaults used when no snapshot exists and by "reset all".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerDefaults {
    pub min_attendance: f64,
    pub term_weeks: u32,
    pub alert_deficit_floor: f64,
}

impl Default for TrackerDefaults {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TrackerDefaults {
    fn from(config: &Config) -> Self {
        Self {
            min_attendance: config.default_min_attendance,
            term_weeks: config.default_term_weeks,
            alert_deficit_floor: config.alert_deficit_floor,
        }
    }
}

impl TrackerDefaults {
    fn fresh_state(&self, today: NaiveDate) -> AttendanceState {
        AttendanceState::new(
            TermWindow::default_from(today, self.term_weeks),
            self.min_attendance,
        )
    }
}

pub struct AttendanceTracker {
    state: AttendanceState,
    notifier: ThresholdNotifier,
    store: Box<dyn SnapshotStore>,
    clock: Box<dyn Clock>,
    defaults: TrackerDefaults,
    pending: Vec<Notification>,
}

impl AttendanceTracker {
    /// Opens a session over `store`, loading the last snapshot (or defaults) and evaluating
    /// thresholds once so alerts for already-low subjects surface at session start.
    pub fn open(store: Box<dyn SnapshotStore>, defaults: TrackerDefaults) -> Self {
        Self::open_with_clock(store, defaults, Box::new(SystemClock))
    }

    pub fn open_with_clock(
        store: Box<dyn SnapshotStore>,
        defaults: TrackerDefaults,
        clock: Box<dyn Clock>,
    ) -> Self {
        let state = load_or_default(store.as_ref(), defaults.fresh_state(clock.today()));
        info!(
            subjects = state.subjects.len(),
            holidays = state.holidays.len(),
            "attendance session opened"
        );
        let mut tracker = Self {
            state,
            notifier: ThresholdNotifier::new(defaults.alert_deficit_floor),
            store,
            clock,
            defaults,
            pending: Vec::new(),
        };
        tracker.check_thresholds();
        tracker
    }

    pub fn state(&self) -> &AttendanceState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Drains notifications queued by the actions performed since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn subject_figures(&self, id: Uuid) -> Option<SubjectFigures> {
        AccountingService::subject_figures(&self.state, id)
    }

    pub fn all_subject_figures(&self) -> Vec<SubjectFigures> {
        AccountingService::all_subject_figures(&self.state)
    }

    pub fn aggregate(&self) -> AggregateFigures {
        AccountingService::aggregate(&self.state)
    }

    pub fn report_rows(&self) -> Vec<ReportRow> {
        report_rows(&self.state)
    }

    pub fn report_header(&self) -> ReportHeader {
        report_header(&self.state, self.today())
    }

    pub fn add_subject(&mut self, name: &str, hours_per_week: f64) -> Option<Uuid> {
        let id = self.state.subjects.add_subject(name, hours_per_week)?;
        info!(subject = name.trim(), hours_per_week, "subject added");
        self.notify(Notification::success(format!(
            "{} added successfully",
            name.trim()
        )));
        self.commit();
        Some(id)
    }

    pub fn remove_subject(&mut self, id: Uuid) -> Option<Subject> {
        let subject = self.state.subjects.remove_subject(id)?;
        info!(subject = %subject.name, "subject removed");
        self.notify(Notification::info(format!("{} removed", subject.name)));
        self.commit();
        Some(subject)
    }

    /// Records one attended hour, refusing once the subject has no remaining hours.
    pub fn record_attended(&mut self, id: Uuid) -> Option<u32> {
        let name = self.recordable_subject(id)?;
        let total = self.state.subjects.record_attended(id)?;
        self.notify(
            Notification::success("Hour attended")
                .with_description(format!("{} - Total attended: {} hrs", name, total)),
        );
        self.commit();
        Some(total)
    }

    /// Records one missed hour, refusing once the subject has no remaining hours.
    pub fn record_missed(&mut self, id: Uuid) -> Option<u32> {
        let name = self.recordable_subject(id)?;
        let total = self.state.subjects.record_missed(id)?;
        self.notify(
            Notification::warning("Hour missed")
                .with_description(format!("{} - Total missed: {} hrs", name, total)),
        );
        self.commit();
        Some(total)
    }

    fn recordable_subject(&mut self, id: Uuid) -> Option<String> {
        let figures = self.subject_figures(id)?;
        if !figures.can_record() {
            debug!(subject = %figures.name, "no remaining hours to record");
            self.notify(
                Notification::warning("No hours remaining")
                    .with_description(format!("{} has no scheduled hours left", figures.name)),
            );
            return None;
        }
        Some(figures.name)
    }

    /// Clears a subject's counters after the gate confirms. Returns whether anything changed.
    pub fn reset_subject(&mut self, id: Uuid, gate: &dyn ConfirmationGate) -> bool {
        let Some(name) = self.state.subjects.get(id).map(|s| s.name.clone()) else {
            return false;
        };
        let prompt = format!(
            "Reset attendance for {}? This will clear all attended and missed hours.",
            name
        );
        if !gate.confirm(&prompt) {
            debug!(subject = %name, "reset declined");
            return false;
        }
        self.state.subjects.reset_counters(id);
        info!(subject = %name, "attendance reset");
        self.notify(
            Notification::success("Attendance reset")
                .with_description(format!("{} attendance has been reset to 0", name)),
        );
        self.commit();
        true
    }

    /// Restores defaults and starts a new alert session after the gate confirms.
    pub fn reset_all(&mut self, gate: &dyn ConfirmationGate) -> bool {
        if !gate.confirm("Are you sure you want to reset all data? This action cannot be undone.") {
            debug!("reset all declined");
            return false;
        }
        self.state = self.defaults.fresh_state(self.today());
        self.notifier.reset_session();
        info!("all attendance data reset");
        self.notify(Notification::success("All data has been reset"));
        self.commit();
        true
    }

    pub fn add_holiday(
        &mut self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cancelled_hours: CancelledHours,
    ) -> Option<Uuid> {
        let id = self
            .state
            .holidays
            .add_holiday(name, start_date, end_date, cancelled_hours)?;
        info!(holiday = name.trim(), "holiday added");
        self.notify(
            Notification::success(format!("{} added", name.trim()))
                .with_description("Total hours recalculated"),
        );
        self.commit();
        Some(id)
    }

    pub fn remove_holiday(&mut self, id: Uuid) -> Option<Holiday> {
        let holiday = self.state.holidays.remove_holiday(id)?;
        info!(holiday = %holiday.name, "holiday removed");
        self.notify(
            Notification::info(format!("{} removed", holiday.name))
                .with_description("Total hours recalculated"),
        );
        self.commit();
        Some(holiday)
    }

    pub fn set_term(&mut self, start_date: NaiveDate, end_date: NaiveDate) {
        self.state.term = TermWindow::new(start_date, end_date);
        info!(%start_date, %end_date, "term updated");
        self.notify(
            Notification::info("Term updated")
                .with_description(format!("{} weeks", self.state.total_weeks())),
        );
        self.commit();
    }

    pub fn set_term_start(&mut self, start_date: NaiveDate) {
        let end_date = self.state.term.end_date;
        self.set_term(start_date, end_date);
    }

    pub fn set_term_end(&mut self, end_date: NaiveDate) {
        let start_date = self.state.term.start_date;
        self.set_term(start_date, end_date);
    }

    /// Updates the threshold; values outside 0-100 are declined.
    pub fn set_min_attendance(&mut self, pct: f64) -> bool {
        if !is_valid_threshold(pct) {
            debug!(pct, "declined out-of-range threshold");
            return false;
        }
        self.state.min_attendance = pct;
        info!(pct, "minimum attendance updated");
        self.notify(Notification::info(format!("Minimum attendance set to {}%", pct)));
        self.commit();
        true
    }

    /// Renders and writes a report into `dir`. Failures leave the state untouched.
    pub fn export(&mut self, kind: ExportKind, dir: &Path) -> Result<PathBuf> {
        let content = kind.render(&self.report_header(), &self.report_rows());
        match write_export(dir, kind, self.today(), &content) {
            Ok(path) => {
                info!(path = %path.display(), "report exported");
                self.notify(Notification::success(format!("{} exported successfully", kind)));
                Ok(path)
            }
            Err(err) => {
                warn!(error = %err, "report export failed");
                self.notify(Notification::error(format!("Failed to export {}", kind)));
                Err(err)
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    /// Persists the snapshot and re-evaluates thresholds after a state change.
    fn commit(&mut self) {
        if let Err(err) = self.store.save(&self.state.to_snapshot()) {
            warn!(error = %err, "could not save attendance snapshot");
            self.notify(
                Notification::error("Could not save attendance data")
                    .with_description(err.to_string()),
            );
        }
        self.check_thresholds();
    }

    fn check_thresholds(&mut self) {
        let alerts = self.notifier.evaluate(&self.state);
        self.pending
            .extend(alerts.iter().map(|alert| alert.to_notification()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::notifier::NotificationLevel;
    use crate::errors::AttendanceError;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    struct SharedStore(Arc<MemoryStorage>);

    impl SnapshotStore for SharedStore {
        fn load(&self) -> Result<Option<crate::ledger::AttendanceSnapshot>> {
            self.0.load()
        }

        fn save(&self, snapshot: &crate::ledger::AttendanceSnapshot) -> Result<()> {
            self.0.save(snapshot)
        }
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Result<Option<crate::ledger::AttendanceSnapshot>> {
            Ok(None)
        }

        fn save(&self, _snapshot: &crate::ledger::AttendanceSnapshot) -> Result<()> {
            Err(AttendanceError::Storage("disk full".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn tracker_with(store: Box<dyn SnapshotStore>) -> AttendanceTracker {
        AttendanceTracker::open_with_clock(
            store,
            TrackerDefaults::default(),
            Box::new(FixedClock(today())),
        )
    }

    fn always(_: &str) -> bool {
        true
    }

    fn never(_: &str) -> bool {
        false
    }

    #[test]
    fn every_mutation_is_persisted() {
        let shared = Arc::new(MemoryStorage::new());
        let mut tracker = tracker_with(Box::new(SharedStore(shared.clone())));
        let id = tracker.add_subject("Math", 3.0).unwrap();
        tracker.record_attended(id).unwrap();

        let reopened = tracker_with(Box::new(SharedStore(shared)));
        let subject = reopened.state().subjects.get(id).unwrap();
        assert_eq!(subject.attended, 1);
    }

    #[test]
    fn recording_stops_when_no_hours_remain() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        let id = tracker.add_subject("Seminar", 1.0).unwrap();
        let term = tracker.state().term;
        tracker
            .add_holiday(
                "Closure",
                term.start_date,
                term.end_date,
                CancelledHours::from_entries([(id, 15.0)]),
            )
            .unwrap();
        assert_eq!(tracker.record_attended(id), Some(1));
        tracker.take_notifications();
        assert_eq!(tracker.record_missed(id), None);
        let notes = tracker.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "No hours remaining");
        assert_eq!(tracker.state().subjects.get(id).unwrap().missed, 0);
    }

    #[test]
    fn declined_confirmation_leaves_counters() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        let id = tracker.add_subject("Math", 3.0).unwrap();
        tracker.record_attended(id);
        assert!(!tracker.reset_subject(id, &never));
        assert_eq!(tracker.state().subjects.get(id).unwrap().attended, 1);
        assert!(tracker.reset_subject(id, &always));
        assert_eq!(tracker.state().subjects.get(id).unwrap().attended, 0);
    }

    #[test]
    fn reset_all_restores_defaults_and_alert_session() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        tracker.set_min_attendance(90.0);
        let id = tracker.add_subject("Law", 2.0).unwrap();
        tracker.record_missed(id);
        assert!(!tracker.reset_all(&never));
        assert_eq!(tracker.state().subjects.len(), 1);

        assert!(tracker.reset_all(&always));
        assert!(tracker.state().subjects.is_empty());
        assert_eq!(tracker.state().min_attendance, 75.0);
        assert_eq!(tracker.state().term, TermWindow::default_from(today(), 16));
    }

    #[test]
    fn low_attendance_alert_is_queued_once() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        let id = tracker.add_subject("Chemistry", 4.0).unwrap();
        tracker.take_notifications();

        tracker.record_missed(id);
        let first = tracker.take_notifications();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].title, "Low Attendance Alert");

        tracker.record_missed(id);
        let second = tracker.take_notifications();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].level, NotificationLevel::Warning);
    }

    #[test]
    fn save_failure_keeps_state_and_reports_error() {
        let mut tracker = tracker_with(Box::new(FailingStore));
        let id = tracker.add_subject("Math", 3.0);
        assert!(id.is_some());
        let notes = tracker.take_notifications();
        assert!(notes
            .iter()
            .any(|n| n.level == NotificationLevel::Error && n.title.contains("save")));
        assert_eq!(tracker.state().subjects.len(), 1);
    }

    #[test]
    fn invalid_threshold_is_declined() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        assert!(!tracker.set_min_attendance(101.0));
        assert!(!tracker.set_min_attendance(-5.0));
        assert_eq!(tracker.state().min_attendance, 75.0);
        assert!(tracker.take_notifications().is_empty());
    }

    #[test]
    fn declined_actions_queue_nothing() {
        let mut tracker = tracker_with(Box::new(MemoryStorage::new()));
        assert!(tracker.add_subject(" ", 3.0).is_none());
        assert!(tracker.remove_subject(Uuid::new_v4()).is_none());
        assert!(tracker.remove_holiday(Uuid::new_v4()).is_none());
        assert!(tracker.take_notifications().is_empty());
    }
}
