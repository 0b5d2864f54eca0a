//! Holiday-adjusted attendance accounting.
//!
//! Every figure here is recomputed from [`AttendanceState`] on each call; nothing is cached, so
//! derived values cannot drift from the ledgers they are computed from.

use uuid::Uuid;

use crate::ledger::{AttendanceState, Subject};

/// Skip budgets at or below this (but still positive) are flagged as running low.
pub const LOW_SKIP_BUDGET_HOURS: i64 = 2;

/// Attendance as a percentage of recorded hours; `0.0` when nothing is recorded.
pub fn attendance_percentage(attended: u64, missed: u64) -> f64 {
    let recorded = attended + missed;
    if recorded == 0 {
        return 0.0;
    }
    attended as f64 / recorded as f64 * 100.0
}

/// Whole hours of absence tolerable over `actual_hours` at the given threshold.
pub fn allowed_absences(actual_hours: f64, min_attendance: f64) -> i64 {
    (actual_hours * (100.0 - min_attendance) / 100.0).floor() as i64
}

/// Scheduled hours less cancellations, never negative.
pub fn actual_hours(scheduled_hours: f64, cancelled_hours: f64) -> f64 {
    (scheduled_hours - cancelled_hours).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectStatus {
    BelowThreshold,
    LowSkipBudget,
    OnTrack,
}

/// Derived figures for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectFigures {
    pub subject_id: Uuid,
    pub name: String,
    pub hours_per_week: f64,
    pub total_weeks: u32,
    pub scheduled_hours: f64,
    pub cancelled_hours: f64,
    pub actual_hours: f64,
    pub attended: u32,
    pub missed: u32,
    /// Not clamped: negative when more hours were recorded than the term holds.
    pub remaining_hours: f64,
    pub attendance_percentage: f64,
    pub allowed_absences: i64,
    /// Not clamped: negative means the absence budget is exceeded.
    pub skip_budget_remaining: i64,
    pub min_attendance: f64,
}

impl SubjectFigures {
    pub fn recorded(&self) -> u32 {
        self.attended.saturating_add(self.missed)
    }

    /// Recording another hour is only allowed while scheduled hours remain.
    pub fn can_record(&self) -> bool {
        self.remaining_hours > 0.0
    }

    pub fn can_reset(&self) -> bool {
        self.recorded() > 0
    }

    pub fn is_below_threshold(&self) -> bool {
        self.recorded() > 0 && self.attendance_percentage < self.min_attendance
    }

    pub fn status(&self) -> SubjectStatus {
        if self.is_below_threshold() {
            SubjectStatus::BelowThreshold
        } else if self.skip_budget_remaining > 0
            && self.skip_budget_remaining <= LOW_SKIP_BUDGET_HOURS
        {
            SubjectStatus::LowSkipBudget
        } else {
            SubjectStatus::OnTrack
        }
    }
}

/// Figures pooled over all subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFigures {
    pub subject_count: usize,
    pub scheduled_hours: f64,
    pub cancelled_hours: f64,
    pub actual_hours: f64,
    pub attended: u64,
    pub missed: u64,
    pub remaining_hours: f64,
    /// Computed from pooled counts, not averaged over subjects.
    pub attendance_percentage: f64,
    pub allowed_absences: i64,
    pub skip_budget_remaining: i64,
    pub min_attendance: f64,
}

impl AggregateFigures {
    pub fn below_target(&self) -> bool {
        self.attendance_percentage < self.min_attendance
    }
}

/// Stateless entry points over [`AttendanceState`].
pub struct AccountingService;

impl AccountingService {
    /// Figures for one subject, `None` for an unknown id.
    pub fn subject_figures(state: &AttendanceState, subject_id: Uuid) -> Option<SubjectFigures> {
        state
            .subjects
            .get(subject_id)
            .map(|subject| Self::figures_for(state, subject))
    }

    /// Figures for every subject in ledger order.
    pub fn all_subject_figures(state: &AttendanceState) -> Vec<SubjectFigures> {
        state
            .subjects
            .iter()
            .map(|subject| Self::figures_for(state, subject))
            .collect()
    }

    pub fn aggregate(state: &AttendanceState) -> AggregateFigures {
        let figures = Self::all_subject_figures(state);
        let scheduled_hours = figures.iter().map(|f| f.scheduled_hours).sum();
        let cancelled_hours = figures.iter().map(|f| f.cancelled_hours).sum();
        let actual_hours: f64 = figures.iter().map(|f| f.actual_hours).sum();
        let attended: u64 = figures.iter().map(|f| u64::from(f.attended)).sum();
        let missed: u64 = figures.iter().map(|f| u64::from(f.missed)).sum();
        let allowed = allowed_absences(actual_hours, state.min_attendance);

        AggregateFigures {
            subject_count: figures.len(),
            scheduled_hours,
            cancelled_hours,
            actual_hours,
            attended,
            missed,
            remaining_hours: actual_hours - attended as f64 - missed as f64,
            attendance_percentage: attendance_percentage(attended, missed),
            allowed_absences: allowed,
            skip_budget_remaining: allowed - missed as i64,
            min_attendance: state.min_attendance,
        }
    }

    fn figures_for(state: &AttendanceState, subject: &Subject) -> SubjectFigures {
        let total_weeks = state.total_weeks();
        let scheduled_hours = subject.hours_per_week * f64::from(total_weeks);
        let cancelled_hours = state.holidays.total_cancelled_hours(subject.id);
        let actual = actual_hours(scheduled_hours, cancelled_hours);
        let allowed = allowed_absences(actual, state.min_attendance);

        SubjectFigures {
            subject_id: subject.id,
            name: subject.name.clone(),
            hours_per_week: subject.hours_per_week,
            total_weeks,
            scheduled_hours,
            cancelled_hours,
            actual_hours: actual,
            attended: subject.attended,
            missed: subject.missed,
            remaining_hours: actual - f64::from(subject.attended) - f64::from(subject.missed),
            attendance_percentage: attendance_percentage(
                u64::from(subject.attended),
                u64::from(subject.missed),
            ),
            allowed_absences: allowed,
            skip_budget_remaining: allowed - i64::from(subject.missed),
            min_attendance: state.min_attendance,
        }
    }
}
