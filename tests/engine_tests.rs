mod common;

use attendance_core::core::{AccountingService, SubjectStatus};
use attendance_core::ledger::{AttendanceState, CancelledHours, TermWindow, UNKNOWN_SUBJECT_NAME};
use attendance_core::ledger::subject_name;
use common::date;

fn sixteen_week_state() -> AttendanceState {
    // 111 days, rounded up to 16 weeks.
    AttendanceState::new(TermWindow::new(date(2025, 9, 1), date(2025, 12, 21)), 75.0)
}

#[test]
fn holiday_adjusted_subject_figures() {
    let mut state = sixteen_week_state();
    assert_eq!(state.total_weeks(), 16);

    let math = state.subjects.add_subject("Math", 3.0).unwrap();
    state.holidays.add_holiday(
        "Autumn Break",
        date(2025, 10, 27),
        date(2025, 10, 31),
        CancelledHours::from_entries([(math, 6.0)]),
    );
    for _ in 0..30 {
        state.subjects.record_attended(math);
    }
    for _ in 0..5 {
        state.subjects.record_missed(math);
    }

    let fig = AccountingService::subject_figures(&state, math).unwrap();
    assert_eq!(fig.scheduled_hours, 48.0);
    assert_eq!(fig.cancelled_hours, 6.0);
    assert_eq!(fig.actual_hours, 42.0);
    assert_eq!(fig.remaining_hours, 7.0);
    assert!((fig.attendance_percentage - 85.714).abs() < 0.01);
    assert_eq!(fig.allowed_absences, 10);
    assert_eq!(fig.skip_budget_remaining, 5);
    assert_eq!(fig.status(), SubjectStatus::OnTrack);
}

#[test]
fn removing_a_holiday_restores_hours() {
    let mut state = sixteen_week_state();
    let math = state.subjects.add_subject("Math", 3.0).unwrap();
    let holiday = state
        .holidays
        .add_holiday(
            "Reading Week",
            date(2025, 11, 3),
            date(2025, 11, 7),
            CancelledHours::from_entries([(math, 3.0)]),
        )
        .unwrap();
    assert_eq!(
        AccountingService::subject_figures(&state, math)
            .unwrap()
            .actual_hours,
        45.0
    );

    state.holidays.remove_holiday(holiday);
    assert_eq!(
        AccountingService::subject_figures(&state, math)
            .unwrap()
            .actual_hours,
        48.0
    );
}

#[test]
fn removed_subject_leaves_stale_holiday_reference() {
    let mut state = sixteen_week_state();
    let art = state.subjects.add_subject("Art", 2.0).unwrap();
    let music = state.subjects.add_subject("Music", 1.0).unwrap();
    state.holidays.add_holiday(
        "Festival",
        date(2025, 10, 1),
        date(2025, 10, 2),
        CancelledHours::from_entries([(art, 2.0), (music, 1.0)]),
    );

    state.subjects.remove_subject(art);

    let holiday = state.holidays.iter().next().unwrap();
    assert_eq!(holiday.total_hours(), 3.0);
    assert_eq!(subject_name(&state.subjects, art), UNKNOWN_SUBJECT_NAME);
    assert_eq!(state.holidays.total_cancelled_hours(art), 2.0);

    let totals = AccountingService::aggregate(&state);
    assert_eq!(totals.subject_count, 1);
    assert_eq!(totals.cancelled_hours, 1.0);
}

#[test]
fn aggregate_pools_counts_across_subjects() {
    let mut state = sixteen_week_state();
    let a = state.subjects.add_subject("A", 1.0).unwrap();
    let b = state.subjects.add_subject("B", 1.0).unwrap();
    state.subjects.record_attended(a);
    for _ in 0..9 {
        state.subjects.record_attended(b);
    }
    for _ in 0..3 {
        state.subjects.record_missed(a);
    }

    let totals = AccountingService::aggregate(&state);
    assert_eq!(totals.attended, 10);
    assert_eq!(totals.missed, 3);
    // 10 / 13, not the mean of 25% and 100%.
    assert!((totals.attendance_percentage - 76.923).abs() < 0.01);
    assert!(!totals.below_target());
}

#[test]
fn raising_the_threshold_shrinks_the_skip_budget() {
    let mut state = sixteen_week_state();
    let law = state.subjects.add_subject("Law", 2.0).unwrap();
    state.subjects.record_missed(law);

    let before = AccountingService::subject_figures(&state, law).unwrap();
    state.min_attendance = 90.0;
    let after = AccountingService::subject_figures(&state, law).unwrap();

    assert_eq!(before.allowed_absences, 8);
    assert_eq!(after.allowed_absences, 3);
    assert_eq!(after.skip_budget_remaining, 2);
}
