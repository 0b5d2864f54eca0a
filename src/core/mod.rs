//! Engine and session logic layered over the ledgers.

pub mod accounting;
pub mod clock;
pub mod notifier;
pub mod report;
pub mod tracker;

pub use accounting::{
    AccountingService, AggregateFigures, SubjectFigures, SubjectStatus, LOW_SKIP_BUDGET_HOURS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use notifier::{
    LowAttendanceAlert, Notification, NotificationLevel, ThresholdNotifier, DEFAULT_DEFICIT_FLOOR,
};
pub use report::{report_header, report_rows, ReportHeader, ReportRow, REPORT_COLUMNS};
pub use tracker::{AttendanceTracker, ConfirmationGate, TrackerDefaults};
