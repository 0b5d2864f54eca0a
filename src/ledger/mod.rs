//! Attendance domain models: term window, subjects, holidays and the state container.

pub mod holiday;
pub mod state;
pub mod subject;
pub mod term;

pub use holiday::{subject_name, CancelledHours, Holiday, HolidayLedger, UNKNOWN_SUBJECT_NAME};
pub use state::{
    is_valid_threshold, AttendanceSnapshot, AttendanceState, CURRENT_SCHEMA_VERSION,
    DEFAULT_MIN_ATTENDANCE,
};
pub use subject::{Subject, SubjectLedger};
pub use term::{duration_days, total_weeks, TermWindow, DEFAULT_TERM_WEEKS, MAX_TERM_WEEKS};
