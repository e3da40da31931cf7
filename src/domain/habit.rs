/// Habit entity and due-date evaluation
///
/// This module defines the core Habit struct representing a recurring task a
/// user wants to track, along with validation, lifecycle transitions
/// (archive / restore / soft delete) and the due-date evaluator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, Goal, HabitId, UserId};

/// A habit is a user-owned recurring task definition
///
/// Each habit has a schedule (frequency plus optional active window) and a
/// goal deciding what counts as done. Archived habits keep their completion
/// history; soft-deleted habits are hidden from all normal queries and purged
/// after a retention period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Owning user
    pub user_id: UserId,
    /// Display name (e.g. "Morning Run", "Drink water")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Optional display color as "#rrggbb"
    pub color: Option<String>,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// What counts as done for one day
    pub goal: Goal,
    /// First day the habit is eligible to be due (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Last day the habit is eligible to be due (inclusive)
    pub end_date: Option<NaiveDate>,
    /// False means archived: excluded from active lists, history retained
    pub is_active: bool,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Set when soft-deleted; such habits are hidden and eventually purged
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// This is the main constructor: every field is checked and an error is
    /// returned before anything reaches persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        name: String,
        description: Option<String>,
        color: Option<String>,
        frequency: Frequency,
        goal: Goal,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_color(&color)?;
        frequency.validate()?;
        goal.validate()?;
        Self::validate_window(&start_date, &end_date)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name,
            description,
            color,
            frequency,
            goal,
            start_date,
            end_date,
            is_active: true,
            created_at: Utc::now(),
            deleted_at: None,
        })
    }

    /// Create a habit from already-validated data (used when loading from
    /// the database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        color: Option<String>,
        frequency: Frequency,
        goal: Goal,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        is_active: bool,
        created_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            color,
            frequency,
            goal,
            start_date,
            end_date,
            is_active,
            created_at,
            deleted_at,
        }
    }

    /// Decide whether this habit is due on a calendar date
    ///
    /// Callable for past, present and future dates identically; there is no
    /// implicit "today" here, which is what makes calendar browsing correct.
    /// Archival is evaluated against the state of the record as loaded, not
    /// against when the archival happened.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        if !self.is_active || self.deleted_at.is_some() {
            return false;
        }
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        // End date is inclusive through the whole of that day.
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        self.frequency.is_scheduled_for_date(date)
    }

    /// Apply a partial edit with revalidation
    ///
    /// `Option<Option<_>>` distinguishes "leave unchanged" (None) from
    /// "clear the field" (Some(None)).
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
        color: Option<Option<String>>,
        frequency: Option<Frequency>,
        goal: Option<Goal>,
        start_date: Option<Option<NaiveDate>>,
        end_date: Option<Option<NaiveDate>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_color) = color {
            Self::validate_color(new_color)?;
        }
        if let Some(ref new_freq) = frequency {
            new_freq.validate()?;
        }
        if let Some(ref new_goal) = goal {
            new_goal.validate()?;
        }

        // The window has a cross-field rule, so validate the would-be pair.
        let new_start = start_date.unwrap_or(self.start_date);
        let new_end = end_date.unwrap_or(self.end_date);
        Self::validate_window(&new_start, &new_end)?;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_color) = color {
            self.color = new_color;
        }
        if let Some(new_frequency) = frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_goal) = goal {
            self.goal = new_goal;
        }
        self.start_date = new_start;
        self.end_date = new_end;

        Ok(())
    }

    /// Archive the habit (reversible; history is retained)
    pub fn archive(&mut self) {
        self.is_active = false;
    }

    /// Restore a previously archived habit
    pub fn restore(&mut self) {
        self.is_active = true;
    }

    /// Mark the habit soft-deleted as of the given instant
    ///
    /// Not restorable through `restore`; the record is purged once the
    /// retention period has elapsed.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    // Validation helpers

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "habit name cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "habit name cannot be longer than 100 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::InvalidValue(
                    "description cannot be longer than 500 characters".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn validate_color(color: &Option<String>) -> Result<(), DomainError> {
        if let Some(c) = color {
            let ok = c.len() == 7
                && c.starts_with('#')
                && c[1..].chars().all(|ch| ch.is_ascii_hexdigit());
            if !ok {
                return Err(DomainError::InvalidColor(format!(
                    "expected #rrggbb, got {:?}",
                    c
                )));
            }
        }
        Ok(())
    }

    fn validate_window(
        start_date: &Option<NaiveDate>,
        end_date: &Option<NaiveDate>,
    ) -> Result<(), DomainError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(DomainError::InvalidWindow(format!(
                    "end date {} is before start date {}",
                    end, start
                )));
            }
        }
        Ok(())
    }
}
