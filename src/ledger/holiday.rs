use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{subject::SubjectLedger, term::duration_days};

/// Label used when a holiday references a subject that no longer exists.
pub const UNKNOWN_SUBJECT_NAME: &str = "Unknown";

/// Sparse subject-id to cancelled-hours mapping with default-zero lookup.
///
/// Only strictly positive, finite amounts are ever stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CancelledHours(BTreeMap<Uuid, f64>);

impl CancelledHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping, dropping zero, negative and non-finite entries.
    /// Repeated ids accumulate.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Uuid, f64)>,
    {
        let mut map = Self::new();
        for (subject_id, hours) in entries {
            map.insert(subject_id, hours);
        }
        map
    }

    /// Adds `hours` for a subject, ignoring amounts that are not positive.
    pub fn insert(&mut self, subject_id: Uuid, hours: f64) {
        if hours.is_finite() && hours > 0.0 {
            *self.0.entry(subject_id).or_insert(0.0) += hours;
        }
    }

    /// Hours cancelled for the subject, `0.0` when it is not referenced.
    pub fn get(&self, subject_id: Uuid) -> f64 {
        self.0.get(&subject_id).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Uuid, f64)> + '_ {
        self.0.iter().map(|(id, hours)| (*id, *hours))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named break during which some scheduled hours do not take place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holiday {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub cancelled_hours: CancelledHours,
}

impl Holiday {
    /// Inclusive length of the break in days.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    /// Total hours cancelled by this holiday across all subjects.
    pub fn total_hours(&self) -> f64 {
        self.cancelled_hours.iter().map(|(_, hours)| hours).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HolidayLedger {
    holidays: Vec<Holiday>,
}

impl HolidayLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a holiday when it cancels at least one positive amount of hours.
    pub fn add_holiday(
        &mut self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        cancelled_hours: CancelledHours,
    ) -> Option<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            debug!("declined holiday with blank name");
            return None;
        }
        if cancelled_hours.is_empty() {
            debug!(name, "declined holiday without cancelled hours");
            return None;
        }
        let holiday = Holiday {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date,
            end_date,
            cancelled_hours,
        };
        let id = holiday.id;
        self.holidays.push(holiday);
        Some(id)
    }

    pub fn remove_holiday(&mut self, id: Uuid) -> Option<Holiday> {
        let pos = self.holidays.iter().position(|h| h.id == id)?;
        Some(self.holidays.remove(pos))
    }

    /// Sum of hours cancelled for a subject across every holiday.
    pub fn total_cancelled_hours(&self, subject_id: Uuid) -> f64 {
        self.holidays
            .iter()
            .map(|h| h.cancelled_hours.get(subject_id))
            .sum()
    }

    pub fn get(&self, id: Uuid) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Holiday> {
        let needle = name.trim();
        self.holidays
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter()
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

/// Resolves a referenced subject's display name, tolerating dangling ids.
pub fn subject_name(subjects: &SubjectLedger, subject_id: Uuid) -> &str {
    subjects
        .get(subject_id)
        .map(|s| s.name.as_str())
        .unwrap_or(UNKNOWN_SUBJECT_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn cancelled_hours_drop_non_positive_entries() {
        let math = Uuid::new_v4();
        let art = Uuid::new_v4();
        let music = Uuid::new_v4();
        let map = CancelledHours::from_entries([(math, 4.0), (art, 0.0), (music, -2.0)]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(math), 4.0);
        assert_eq!(map.get(art), 0.0);
        assert_eq!(map.get(Uuid::new_v4()), 0.0);
    }

    #[test]
    fn holiday_without_positive_hours_is_declined() {
        let mut ledger = HolidayLedger::new();
        let empty = CancelledHours::from_entries([(Uuid::new_v4(), 0.0)]);
        let id = ledger.add_holiday("Spring Break", date(2025, 3, 10), date(2025, 3, 14), empty);
        assert!(id.is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn cancellations_stack_across_holidays() {
        let mut ledger = HolidayLedger::new();
        let math = Uuid::new_v4();
        let other = Uuid::new_v4();
        ledger
            .add_holiday(
                "Winter Break",
                date(2025, 12, 20),
                date(2026, 1, 4),
                CancelledHours::from_entries([(math, 6.0), (other, 2.0)]),
            )
            .unwrap();
        ledger
            .add_holiday(
                "Founders Day",
                date(2025, 10, 3),
                date(2025, 10, 3),
                CancelledHours::from_entries([(math, 1.5)]),
            )
            .unwrap();
        assert_eq!(ledger.total_cancelled_hours(math), 7.5);
        assert_eq!(ledger.total_cancelled_hours(other), 2.0);
        assert_eq!(ledger.total_cancelled_hours(Uuid::new_v4()), 0.0);
    }

    #[test]
    fn removing_unknown_holiday_is_silent() {
        let mut ledger = HolidayLedger::new();
        assert!(ledger.remove_holiday(Uuid::new_v4()).is_none());
    }

    #[test]
    fn dangling_subject_reference_reads_as_unknown() {
        let subjects = SubjectLedger::new();
        assert_eq!(subject_name(&subjects, Uuid::new_v4()), UNKNOWN_SUBJECT_NAME);
    }

    #[test]
    fn holiday_reports_duration_and_total() {
        let mut ledger = HolidayLedger::new();
        let id = ledger
            .add_holiday(
                "Reading Week",
                date(2025, 10, 20),
                date(2025, 10, 24),
                CancelledHours::from_entries([(Uuid::new_v4(), 3.0), (Uuid::new_v4(), 2.0)]),
            )
            .unwrap();
        let holiday = ledger.get(id).unwrap();
        assert_eq!(holiday.duration_days(), 5);
        assert_eq!(holiday.total_hours(), 5.0);
    }
}
