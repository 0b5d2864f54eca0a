//! Session-scoped low-attendance alerts and the informational notifications that accompany
//! every tracker action.

use std::{collections::HashSet, fmt};

use tracing::info;
use uuid::Uuid;

use crate::core::accounting::{AccountingService, SubjectFigures};
use crate::ledger::AttendanceState;

/// Minimum percentage-point deficit below the threshold before an alert fires.
pub const DEFAULT_DEFICIT_FLOOR: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-facing message emitted by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.title, description),
            None => f.write_str(&self.title),
        }
    }
}

/// A one-shot warning that a subject has fallen meaningfully below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LowAttendanceAlert {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub attendance_percentage: f64,
    pub min_attendance: f64,
}

impl LowAttendanceAlert {
    pub fn deficit(&self) -> f64 {
        self.min_attendance - self.attendance_percentage
    }

    pub fn to_notification(&self) -> Notification {
        Notification::error("Low Attendance Alert").with_description(format!(
            "{} is at {:.1}% (below {}%)",
            self.subject_name, self.attendance_percentage, self.min_attendance
        ))
    }
}

/// Tracks which subjects have already been alerted during this session.
///
/// A subject moves from normal to alerted at most once; only a new session (a fresh notifier or
/// [`ThresholdNotifier::reset_session`]) clears it.
#[derive(Debug, Clone)]
pub struct ThresholdNotifier {
    alerted: HashSet<Uuid>,
    deficit_floor: f64,
}

impl Default for ThresholdNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_DEFICIT_FLOOR)
    }
}

impl ThresholdNotifier {
    pub fn new(deficit_floor: f64) -> Self {
        Self {
            alerted: HashSet::new(),
            deficit_floor,
        }
    }

    /// Evaluates every subject and returns alerts for those crossing the threshold for the
    /// first time this session.
    pub fn evaluate(&mut self, state: &AttendanceState) -> Vec<LowAttendanceAlert> {
        AccountingService::all_subject_figures(state)
            .into_iter()
            .filter_map(|figures| self.evaluate_subject(&figures))
            .collect()
    }

    /// Evaluates a single subject's figures, recording the alert when one fires.
    pub fn evaluate_subject(&mut self, figures: &SubjectFigures) -> Option<LowAttendanceAlert> {
        if self.alerted.contains(&figures.subject_id) || !self.should_alert(figures) {
            return None;
        }
        self.alerted.insert(figures.subject_id);
        info!(
            subject = %figures.name,
            percentage = figures.attendance_percentage,
            "low attendance alert raised"
        );
        Some(LowAttendanceAlert {
            subject_id: figures.subject_id,
            subject_name: figures.name.clone(),
            attendance_percentage: figures.attendance_percentage,
            min_attendance: figures.min_attendance,
        })
    }

    fn should_alert(&self, figures: &SubjectFigures) -> bool {
        figures.recorded() > 0
            && figures.attendance_percentage < figures.min_attendance
            && figures.min_attendance - figures.attendance_percentage >= self.deficit_floor
    }

    pub fn has_alerted(&self, subject_id: Uuid) -> bool {
        self.alerted.contains(&subject_id)
    }

    /// Starts a new session: every subject returns to the normal state.
    pub fn reset_session(&mut self) {
        self.alerted.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ledger::TermWindow;

    fn state_with_subject() -> (AttendanceState, Uuid) {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 22).unwrap();
        let mut state = AttendanceState::new(TermWindow::new(start, end), 75.0);
        let id = state.subjects.add_subject("Statistics", 4.0).unwrap();
        (state, id)
    }

    #[test]
    fn worsening_attendance_alerts_only_once() {
        let (mut state, id) = state_with_subject();
        let mut notifier = ThresholdNotifier::default();

        // 4/5 = 80%
        for _ in 0..4 {
            state.subjects.record_attended(id);
        }
        state.subjects.record_missed(id);
        assert!(notifier.evaluate(&state).is_empty());

        // 6/10 = 60%
        state.subjects.record_attended(id);
        state.subjects.record_attended(id);
        for _ in 0..3 {
            state.subjects.record_missed(id);
        }
        let alerts = notifier.evaluate(&state);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].subject_id, id);
        assert!((alerts[0].attendance_percentage - 60.0).abs() < 1e-9);

        // 6/15 = 40%
        for _ in 0..5 {
            state.subjects.record_missed(id);
        }
        assert!(notifier.evaluate(&state).is_empty());
        assert!(notifier.has_alerted(id));
    }

    #[test]
    fn marginal_dip_does_not_alert() {
        let (mut state, id) = state_with_subject();
        let mut notifier = ThresholdNotifier::default();
        // 29/40 = 72.5%, deficit 2.5
        for _ in 0..29 {
            state.subjects.record_attended(id);
        }
        for _ in 0..11 {
            state.subjects.record_missed(id);
        }
        assert!(notifier.evaluate(&state).is_empty());
    }

    #[test]
    fn all_missed_counts_as_recorded() {
        let (mut state, id) = state_with_subject();
        let mut notifier = ThresholdNotifier::default();
        state.subjects.record_missed(id);
        assert_eq!(notifier.evaluate(&state).len(), 1);
    }

    #[test]
    fn nothing_recorded_never_alerts() {
        let (state, _) = state_with_subject();
        let mut notifier = ThresholdNotifier::default();
        assert!(notifier.evaluate(&state).is_empty());
    }

    #[test]
    fn improvement_does_not_clear_alert_but_new_session_does() {
        let (mut state, id) = state_with_subject();
        let mut notifier = ThresholdNotifier::default();
        state.subjects.record_missed(id);
        assert_eq!(notifier.evaluate(&state).len(), 1);

        for _ in 0..20 {
            state.subjects.record_attended(id);
        }
        assert!(notifier.evaluate(&state).is_empty());
        assert!(notifier.has_alerted(id));

        state.subjects.reset_counters(id);
        state.subjects.record_missed(id);
        assert!(notifier.evaluate(&state).is_empty());

        notifier.reset_session();
        assert_eq!(notifier.evaluate(&state).len(), 1);
    }

    #[test]
    fn alert_notification_mentions_subject_and_threshold() {
        let alert = LowAttendanceAlert {
            subject_id: Uuid::new_v4(),
            subject_name: "Statistics".into(),
            attendance_percentage: 62.5,
            min_attendance: 75.0,
        };
        let note = alert.to_notification();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(
            note.description.as_deref(),
            Some("Statistics is at 62.5% (below 75%)")
        );
        assert_eq!(alert.deficit(), 12.5);
    }
}
