//! Term window arithmetic.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a term when no explicit dates have been chosen.
pub const DEFAULT_TERM_WEEKS: u32 = 16;

/// Longest default term length accepted from configuration (ten years).
pub const MAX_TERM_WEEKS: u32 = 520;

const DAYS_PER_WEEK: i64 = 7;

/// The calendar window over which attendance is tracked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TermWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// A window starting on `today` and spanning `weeks` whole weeks.
    ///
    /// Falls back to [`DEFAULT_TERM_WEEKS`] when the end date would leave the calendar range.
    pub fn default_from(today: NaiveDate, weeks: u32) -> Self {
        let end_date = weeks_after(today, weeks)
            .or_else(|| weeks_after(today, DEFAULT_TERM_WEEKS))
            .unwrap_or(today);
        Self::new(today, end_date)
    }

    /// Total weeks in the term, never less than one.
    pub fn total_weeks(&self) -> u32 {
        total_weeks(Some(self.start_date), Some(self.end_date))
    }
}

fn weeks_after(date: NaiveDate, weeks: u32) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::weeks(i64::from(weeks)))
}

/// Term length in whole weeks, rounded up and floored at one.
///
/// Missing dates yield `0`; callers must guard before using the result as a divisor.
pub fn total_weeks(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    let days = (end - start).num_days().abs();
    let weeks = (days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;
    u32::try_from(weeks).unwrap_or(u32::MAX).max(1)
}

/// Inclusive number of calendar days between two dates, in either order.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}
