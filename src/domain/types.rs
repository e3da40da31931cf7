/// Core identifier and schedule types used throughout the domain layer.
///
/// This module defines the ID newtypes plus the Frequency and Goal sum types
/// that drive due-date evaluation and completion reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::domain::calendar;
use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// A wrapper around UUID for type safety - you can't accidentally pass a
/// habit ID where a completion ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a completion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionId(pub Uuid);

impl CompletionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Default for CompletionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of the user who owns a habit
///
/// Habits and their completion history are always scoped to one owner;
/// completions inherit ownership through their habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a habit should be performed
///
/// Days use the Monday=0..Sunday=6 convention from `calendar`. The set is the
/// semantic carrier for specific days: duplicates collapse and order is
/// irrelevant.
///
/// `Unsupported` exists only as a deserialization catch-all for tags written
/// by older versions of the schema. It cannot pass validation, so it is never
/// persisted by this code, and a habit carrying it is never due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frequency {
    /// Every single day
    Daily,
    /// Specific days of the week (Monday=0 .. Sunday=6)
    SpecificDays { days: BTreeSet<u8> },
    /// Unrecognized schedule tag read from storage; never due
    #[serde(other)]
    Unsupported,
}

impl Frequency {
    /// Build a specific-days schedule from any iterator of day numbers
    pub fn specific_days<I: IntoIterator<Item = u8>>(days: I) -> Self {
        Frequency::SpecificDays {
            days: days.into_iter().collect(),
        }
    }

    /// Validate that a frequency value is well-formed
    ///
    /// Runs at habit create/update time, before persistence. Invalid
    /// schedules are rejected here and never silently coerced.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Frequency::Daily => Ok(()),
            Frequency::SpecificDays { days } => {
                if days.is_empty() {
                    return Err(DomainError::InvalidSchedule(
                        "specific-days schedule must include at least one day".to_string(),
                    ));
                }
                if let Some(bad) = days.iter().find(|d| **d > 6) {
                    return Err(DomainError::InvalidSchedule(format!(
                        "day {} is out of range (expected 0-6, Monday=0)",
                        bad
                    )));
                }
                Ok(())
            }
            Frequency::Unsupported => Err(DomainError::InvalidSchedule(
                "unsupported schedule kind".to_string(),
            )),
        }
    }

    /// Check whether this frequency schedules the habit on a given date
    ///
    /// Pure calendar logic; the habit's active window and archival state are
    /// layered on top by `Habit::is_due_on`.
    pub fn is_scheduled_for_date(&self, date: chrono::NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::SpecificDays { days } => {
                days.contains(&calendar::day_of_week_mon_first(date))
            }
            // Fail closed: a corrupt or legacy record must never crash a
            // whole-list computation, it just never comes due.
            Frequency::Unsupported => false,
        }
    }
}

/// What counts as "done" for a habit on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goal {
    /// Done if any completion with value >= 1 exists for the day
    YesNo,
    /// Done once the day's accumulated value reaches the target
    Target { target: u32, unit: String },
    /// Unrecognized goal tag read from storage; never completed
    #[serde(other)]
    Unsupported,
}

impl Goal {
    /// Validate that a goal value is well-formed
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Goal::YesNo => Ok(()),
            Goal::Target { target, unit } => {
                if *target == 0 {
                    return Err(DomainError::InvalidGoal(
                        "target must be at least 1".to_string(),
                    ));
                }
                if *target > 10_000 {
                    return Err(DomainError::InvalidGoal(
                        "target cannot exceed 10000".to_string(),
                    ));
                }
                let trimmed = unit.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::InvalidGoal("unit cannot be empty".to_string()));
                }
                if trimmed.len() > 20 {
                    return Err(DomainError::InvalidGoal(
                        "unit cannot be longer than 20 characters".to_string(),
                    ));
                }
                Ok(())
            }
            Goal::Unsupported => Err(DomainError::InvalidGoal(
                "unsupported goal kind".to_string(),
            )),
        }
    }

    /// Does a day's accumulated value satisfy this goal?
    pub fn is_met_by(&self, value: u32) -> bool {
        match self {
            Goal::YesNo => value >= 1,
            Goal::Target { target, .. } => value >= *target,
            Goal::Unsupported => false,
        }
    }

    /// Display string for the goal (e.g. "8 glasses")
    pub fn display(&self) -> String {
        match self {
            Goal::YesNo => "yes/no".to_string(),
            Goal::Target { target, unit } => format!("{} {}", target, unit),
            Goal::Unsupported => "unsupported".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_days_deduplicates() {
        let freq = Frequency::specific_days([0, 2, 2, 4, 0]);
        match &freq {
            Frequency::SpecificDays { days } => {
                assert_eq!(days.len(), 3);
            }
            _ => panic!("expected specific days"),
        }
        assert!(freq.validate().is_ok());
    }

    #[test]
    fn test_empty_specific_days_rejected() {
        let freq = Frequency::specific_days([]);
        assert!(freq.validate().is_err());
    }

    #[test]
    fn test_out_of_range_day_rejected() {
        let freq = Frequency::specific_days([1, 7]);
        assert!(freq.validate().is_err());
    }

    #[test]
    fn test_unknown_schedule_tag_deserializes_fail_closed() {
        let json = r#"{"kind":"lunar_cycle"}"#;
        let freq: Frequency = serde_json::from_str(json).unwrap();
        assert_eq!(freq, Frequency::Unsupported);
        assert!(freq.validate().is_err());
        // Never due, regardless of the date asked about.
        let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(!freq.is_scheduled_for_date(date));
    }

    #[test]
    fn test_frequency_serde_round_trip() {
        let freq = Frequency::specific_days([0, 2, 4]);
        let json = serde_json::to_string(&freq).unwrap();
        let back: Frequency = serde_json::from_str(&json).unwrap();
        assert_eq!(freq, back);
    }

    #[test]
    fn test_goal_validation() {
        assert!(Goal::YesNo.validate().is_ok());
        assert!(Goal::Target {
            target: 8,
            unit: "glasses".to_string()
        }
        .validate()
        .is_ok());
        assert!(Goal::Target {
            target: 0,
            unit: "glasses".to_string()
        }
        .validate()
        .is_err());
        assert!(Goal::Target {
            target: 5,
            unit: "".to_string()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_goal_is_met_by() {
        assert!(Goal::YesNo.is_met_by(1));
        assert!(!Goal::YesNo.is_met_by(0));

        let goal = Goal::Target {
            target: 8,
            unit: "glasses".to_string(),
        };
        assert!(!goal.is_met_by(5));
        assert!(goal.is_met_by(8));
        assert!(goal.is_met_by(13));
    }
}
