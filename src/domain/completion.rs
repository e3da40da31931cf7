/// Completion entity: the record that a habit was performed on a day
///
/// One logical completion exists per (habit, calendar day); repeated check-ins
/// accumulate into the same record's value rather than creating duplicates.
/// The storage layer enforces this with a unique index and an upsert.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CompletionId, DomainError, HabitId};

/// Upper bound on a single day's accumulated value
pub const MAX_COMPLETION_VALUE: u32 = 100_000;

/// A record that a habit was performed on a specific calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this record
    pub id: CompletionId,
    /// Which habit this completion is for
    pub habit_id: HabitId,
    /// The calendar day the completion is for (time-of-day is not meaningful)
    pub date: NaiveDate,
    /// Accumulated value for the day; >= 1 counts as "done" for yes/no goals
    pub value: u32,
    /// When this record was last written
    pub logged_at: DateTime<Utc>,
}

impl Completion {
    /// Create a new completion with validation
    pub fn new(habit_id: HabitId, date: NaiveDate, value: u32) -> Result<Self, DomainError> {
        Self::validate_value(value)?;
        Ok(Self {
            id: CompletionId::new(),
            habit_id,
            date,
            value,
            logged_at: Utc::now(),
        })
    }

    /// Create a completion from already-validated data (database loading)
    pub fn from_existing(
        id: CompletionId,
        habit_id: HabitId,
        date: NaiveDate,
        value: u32,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            value,
            logged_at,
        }
    }

    pub fn validate_value(value: u32) -> Result<(), DomainError> {
        if value > MAX_COMPLETION_VALUE {
            return Err(DomainError::InvalidValue(format!(
                "value cannot exceed {}",
                MAX_COMPLETION_VALUE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_completion() {
        let habit_id = HabitId::new();
        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let completion = Completion::new(habit_id, day, 3).unwrap();

        assert_eq!(completion.habit_id, habit_id);
        assert_eq!(completion.date, day);
        assert_eq!(completion.value, 3);
    }

    #[test]
    fn test_oversized_value_rejected() {
        let habit_id = HabitId::new();
        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert!(Completion::new(habit_id, day, MAX_COMPLETION_VALUE + 1).is_err());
    }
}
