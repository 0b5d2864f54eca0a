//! Flat report rows derived from the accounting engine.

use chrono::NaiveDate;

use crate::core::accounting::{AccountingService, SubjectFigures};
use crate::ledger::AttendanceState;

/// Column titles, in row field order.
pub const REPORT_COLUMNS: [&str; 12] = [
    "Subject",
    "Hours Per Week",
    "Total Weeks",
    "Scheduled Hours",
    "Cancelled Hours",
    "Actual Total Hours",
    "Attended (hrs)",
    "Missed (hrs)",
    "Remaining (hrs)",
    "Attendance %",
    "Allowed Absences (hrs)",
    "Hours Can Still Skip",
];

/// One subject's line in an exported report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub subject: String,
    pub hours_per_week: f64,
    pub total_weeks: u32,
    pub scheduled_hours: f64,
    pub cancelled_hours: f64,
    pub actual_hours: f64,
    pub attended: u32,
    pub missed: u32,
    pub remaining_hours: f64,
    /// Two decimal places, `"0.00"` when nothing is recorded.
    pub attendance_percentage: String,
    pub allowed_absences: i64,
    pub skip_budget_remaining: i64,
}

impl From<&SubjectFigures> for ReportRow {
    fn from(figures: &SubjectFigures) -> Self {
        Self {
            subject: figures.name.clone(),
            hours_per_week: figures.hours_per_week,
            total_weeks: figures.total_weeks,
            scheduled_hours: figures.scheduled_hours,
            cancelled_hours: figures.cancelled_hours,
            actual_hours: figures.actual_hours,
            attended: figures.attended,
            missed: figures.missed,
            remaining_hours: figures.remaining_hours,
            attendance_percentage: format!("{:.2}", figures.attendance_percentage),
            allowed_absences: figures.allowed_absences,
            skip_budget_remaining: figures.skip_budget_remaining,
        }
    }
}

impl ReportRow {
    /// Cells formatted for tabular output, matching [`REPORT_COLUMNS`].
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.hours_per_week.to_string(),
            self.total_weeks.to_string(),
            format!("{:.1}", self.scheduled_hours),
            format!("{:.1}", self.cancelled_hours),
            format!("{:.1}", self.actual_hours),
            self.attended.to_string(),
            self.missed.to_string(),
            format!("{:.1}", self.remaining_hours),
            self.attendance_percentage.clone(),
            self.allowed_absences.to_string(),
            self.skip_budget_remaining.to_string(),
        ]
    }
}

/// Report-wide context printed above the subject rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub generated_on: NaiveDate,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub min_attendance: f64,
    /// One decimal place.
    pub overall_percentage: String,
    pub total_attended: u64,
    pub total_missed: u64,
}

/// Builds one row per subject; an empty ledger yields an empty vector.
pub fn report_rows(state: &AttendanceState) -> Vec<ReportRow> {
    AccountingService::all_subject_figures(state)
        .iter()
        .map(ReportRow::from)
        .collect()
}

pub fn report_header(state: &AttendanceState, generated_on: NaiveDate) -> ReportHeader {
    let aggregate = AccountingService::aggregate(state);
    ReportHeader {
        generated_on,
        term_start: state.term.start_date,
        term_end: state.term.end_date,
        min_attendance: state.min_attendance,
        overall_percentage: format!("{:.1}", aggregate.attendance_percentage),
        total_attended: aggregate.attended,
        total_missed: aggregate.missed,
    }
}
