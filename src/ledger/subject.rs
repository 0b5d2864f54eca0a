use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// A tracked subject with its weekly load and running attendance counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub hours_per_week: f64,
    #[serde(default)]
    pub attended: u32,
    #[serde(default)]
    pub missed: u32,
}

impl Subject {
    /// Creates a subject with zeroed counters.
    pub fn new(name: impl Into<String>, hours_per_week: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hours_per_week,
            attended: 0,
            missed: 0,
        }
    }

    /// Hours recorded so far, attended or missed.
    pub fn recorded(&self) -> u32 {
        self.attended.saturating_add(self.missed)
    }
}

/// Ordered collection of subjects. A plain counter store: it applies no attendance policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SubjectLedger {
    subjects: Vec<Subject>,
}

impl SubjectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subject, declining blank names and non-positive or non-finite weekly hours.
    pub fn add_subject(&mut self, name: &str, hours_per_week: f64) -> Option<Uuid> {
        let name = name.trim();
        if name.is_empty() {
            debug!("declined subject with blank name");
            return None;
        }
        if !hours_per_week.is_finite() || hours_per_week <= 0.0 {
            debug!(hours_per_week, "declined subject with non-positive weekly hours");
            return None;
        }
        let subject = Subject::new(name, hours_per_week);
        let id = subject.id;
        self.subjects.push(subject);
        Some(id)
    }

    /// Removes a subject. Holidays referencing it are left untouched.
    pub fn remove_subject(&mut self, id: Uuid) -> Option<Subject> {
        let pos = self.subjects.iter().position(|s| s.id == id)?;
        Some(self.subjects.remove(pos))
    }

    /// Increments the attended counter, returning the new total.
    pub fn record_attended(&mut self, id: Uuid) -> Option<u32> {
        let subject = self.get_mut(id)?;
        subject.attended = subject.attended.saturating_add(1);
        Some(subject.attended)
    }

    /// Increments the missed counter, returning the new total.
    pub fn record_missed(&mut self, id: Uuid) -> Option<u32> {
        let subject = self.get_mut(id)?;
        subject.missed = subject.missed.saturating_add(1);
        Some(subject.missed)
    }

    /// Zeroes both counters. Returns `false` for an unknown id.
    pub fn reset_counters(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(subject) => {
                subject.attended = 0;
                subject.missed = 0;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|s| s.id == id)
    }

    /// Case-insensitive lookup on the trimmed name.
    pub fn find_by_name(&self, name: &str) -> Option<&Subject> {
        let needle = name.trim();
        self.subjects
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
