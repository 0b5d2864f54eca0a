use attendance_core::core::AccountingService;
use attendance_core::ledger::{AttendanceState, CancelledHours};
use attendance_core::storage::json_backend::{load_snapshot_from_path, save_snapshot_to_path};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn build_sample_state(subject_count: usize, holiday_count: usize) -> AttendanceState {
    let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
    let mut state = AttendanceState::with_defaults(start);

    let ids: Vec<_> = (0..subject_count)
        .filter_map(|idx| {
            state
                .subjects
                .add_subject(&format!("Subject {idx}"), 1.0 + (idx % 5) as f64)
        })
        .collect();

    for (idx, id) in ids.iter().enumerate() {
        for _ in 0..(idx % 20) {
            state.subjects.record_attended(*id);
        }
        for _ in 0..(idx % 7) {
            state.subjects.record_missed(*id);
        }
    }

    for idx in 0..holiday_count {
        let day = start + Duration::days((idx * 3) as i64);
        let cancelled = CancelledHours::from_entries(
            ids.iter()
                .skip(idx % 4)
                .step_by(4)
                .map(|id| (*id, 1.0 + (idx % 3) as f64)),
        );
        state
            .holidays
            .add_holiday(&format!("Break {idx}"), day, day, cancelled);
    }

    state
}

fn bench_accounting(c: &mut Criterion) {
    let state = build_sample_state(200, 50);

    c.bench_function("subject_figures_200x50", |b| {
        b.iter(|| black_box(AccountingService::all_subject_figures(black_box(&state))))
    });

    c.bench_function("aggregate_200x50", |b| {
        b.iter(|| black_box(AccountingService::aggregate(black_box(&state))))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = build_sample_state(200, 50).to_snapshot();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("attendance.json");

    c.bench_function("snapshot_save_200x50", |b| {
        b.iter(|| save_snapshot_to_path(&snapshot, &path).expect("save snapshot"))
    });

    save_snapshot_to_path(&snapshot, &path).expect("seed");

    c.bench_function("snapshot_load_200x50", |b| {
        b.iter(|| black_box(load_snapshot_from_path(&path).expect("load snapshot")))
    });
}

criterion_group!(benches, bench_accounting, bench_snapshot_io);
criterion_main!(benches);
