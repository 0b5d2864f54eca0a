use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    holiday::HolidayLedger,
    subject::SubjectLedger,
    term::{TermWindow, DEFAULT_TERM_WEEKS},
};

pub const DEFAULT_MIN_ATTENDANCE: f64 = 75.0;
pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Everything the accounting engine reads: term, threshold and both ledgers.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceState {
    pub term: TermWindow,
    pub min_attendance: f64,
    pub subjects: SubjectLedger,
    pub holidays: HolidayLedger,
}

impl AttendanceState {
    pub fn new(term: TermWindow, min_attendance: f64) -> Self {
        Self {
            term,
            min_attendance,
            subjects: SubjectLedger::new(),
            holidays: HolidayLedger::new(),
        }
    }

    /// Fresh state: a default-length term starting today, the default threshold, no records.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self::new(
            TermWindow::default_from(today, DEFAULT_TERM_WEEKS),
            DEFAULT_MIN_ATTENDANCE,
        )
    }

    pub fn total_weeks(&self) -> u32 {
        self.term.total_weeks()
    }

    pub fn to_snapshot(&self) -> AttendanceSnapshot {
        AttendanceSnapshot {
            schema_version: CURRENT_SCHEMA_VERSION,
            start_date: Some(self.term.start_date),
            end_date: Some(self.term.end_date),
            min_attendance: Some(self.min_attendance),
            subjects: self.subjects.clone(),
            holidays: self.holidays.clone(),
        }
    }

    /// Rebuilds state from a snapshot, filling absent or out-of-range fields from `defaults`.
    pub fn from_snapshot(snapshot: AttendanceSnapshot, defaults: &AttendanceState) -> Self {
        let min_attendance = snapshot
            .min_attendance
            .filter(|pct| is_valid_threshold(*pct))
            .unwrap_or(defaults.min_attendance);
        Self {
            term: TermWindow::new(
                snapshot.start_date.unwrap_or(defaults.term.start_date),
                snapshot.end_date.unwrap_or(defaults.term.end_date),
            ),
            min_attendance,
            subjects: snapshot.subjects,
            holidays: snapshot.holidays,
        }
    }
}

/// Whether a percentage is usable as the minimum-attendance threshold.
pub fn is_valid_threshold(pct: f64) -> bool {
    pct.is_finite() && (0.0..=100.0).contains(&pct)
}

/// Persisted form of [`AttendanceState`], rewritten wholesale on every change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceSnapshot {
    #[serde(default = "AttendanceSnapshot::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub min_attendance: Option<f64>,
    #[serde(default)]
    pub subjects: SubjectLedger,
    #[serde(default)]
    pub holidays: HolidayLedger,
}

impl AttendanceSnapshot {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
