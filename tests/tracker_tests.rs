mod common;

use attendance_core::core::{NotificationLevel, ThresholdNotifier};
use attendance_core::ledger::{AttendanceState, CancelledHours};
use common::{open_tracker, setup_test_env, term_start};

fn alert_titles(notes: &[attendance_core::core::Notification]) -> usize {
    notes
        .iter()
        .filter(|note| note.title == "Low Attendance Alert")
        .count()
}

#[test]
fn alert_fires_once_per_session_and_again_after_restart() {
    let (storage, _config, _base) = setup_test_env();
    let mut tracker = open_tracker(storage.clone());
    let physics = tracker.add_subject("Physics", 4.0).unwrap();
    for _ in 0..4 {
        tracker.record_attended(physics);
    }
    tracker.take_notifications();

    // 4/5 = 80%, 4/6 = 66.7%, 4/7 = 57.1%
    tracker.record_missed(physics);
    assert_eq!(alert_titles(&tracker.take_notifications()), 0);
    tracker.record_missed(physics);
    assert_eq!(alert_titles(&tracker.take_notifications()), 1);
    tracker.record_missed(physics);
    assert_eq!(alert_titles(&tracker.take_notifications()), 0);
    drop(tracker);

    let mut reopened = open_tracker(storage);
    let startup = reopened.take_notifications();
    assert_eq!(alert_titles(&startup), 1);
    assert_eq!(startup[0].level, NotificationLevel::Error);
}

#[test]
fn recovering_does_not_rearm_the_alert() {
    let mut state = AttendanceState::with_defaults(term_start());
    let id = state.subjects.add_subject("Art", 2.0).unwrap();
    let mut notifier = ThresholdNotifier::default();

    state.subjects.record_missed(id);
    assert_eq!(notifier.evaluate(&state).len(), 1);

    for _ in 0..10 {
        state.subjects.record_attended(id);
    }
    assert!(notifier.evaluate(&state).is_empty());
    for _ in 0..10 {
        state.subjects.record_missed(id);
    }
    assert!(notifier.evaluate(&state).is_empty());
    assert!(notifier.has_alerted(id));
}

#[test]
fn holiday_changes_report_recalculation() {
    let (storage, _config, _base) = setup_test_env();
    let mut tracker = open_tracker(storage);
    let math = tracker.add_subject("Math", 3.0).unwrap();
    tracker.take_notifications();

    let holiday = tracker
        .add_holiday(
            "Reading Week",
            term_start(),
            term_start(),
            CancelledHours::from_entries([(math, 3.0)]),
        )
        .unwrap();
    let notes = tracker.take_notifications();
    assert_eq!(notes[0].title, "Reading Week added");
    assert_eq!(notes[0].description.as_deref(), Some("Total hours recalculated"));
    assert_eq!(tracker.subject_figures(math).unwrap().actual_hours, 45.0);

    tracker.remove_holiday(holiday).unwrap();
    assert_eq!(tracker.take_notifications()[0].level, NotificationLevel::Info);
    assert_eq!(tracker.subject_figures(math).unwrap().actual_hours, 48.0);
}

#[test]
fn changing_the_term_rescales_scheduled_hours() {
    let (storage, _config, _base) = setup_test_env();
    let mut tracker = open_tracker(storage);
    let math = tracker.add_subject("Math", 3.0).unwrap();

    tracker.set_term_end(term_start() + chrono::Duration::weeks(10));
    assert_eq!(tracker.state().total_weeks(), 10);
    assert_eq!(tracker.subject_figures(math).unwrap().scheduled_hours, 30.0);
}
