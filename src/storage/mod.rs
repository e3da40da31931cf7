/// Storage layer for persisting habits and completions
///
/// This module defines the two store contracts the engine consumes plus the
/// SQLite implementation. The completion uniqueness invariant (one row per
/// habit per day) lives here, enforced by a unique index and an upsert.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{Completion, CompletionId, Habit, HabitId, UserId};

/// How long soft-deleted habits are retained before the purge sweep removes
/// them for good
pub const RETENTION_DAYS: i64 = 30;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("completion not found: {completion_id}")]
    CompletionNotFound { completion_id: String },

    #[error("migration error: {0}")]
    Migration(String),
}

/// Store contract for habit definitions
///
/// All reads are scoped to an owner and exclude soft-deleted records; those
/// stay on disk until `purge_deleted` sweeps them after the retention period.
pub trait HabitStore {
    /// Persist a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Load one habit by owner and id
    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Write back an edited habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// List a user's habits, newest first; archived ones only on request
    fn list_habits(
        &self,
        user_id: &UserId,
        include_archived: bool,
    ) -> Result<Vec<Habit>, StorageError>;

    /// Archive a habit (is_active = false); history is retained
    fn archive_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError>;

    /// Restore a previously archived habit
    fn restore_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError>;

    /// Soft-delete a habit; it disappears from all normal queries
    fn soft_delete_habit(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Hard-delete habits (and their completions) soft-deleted more than
    /// `RETENTION_DAYS` before `now`; returns how many habits were purged
    fn purge_deleted(&self, now: DateTime<Utc>) -> Result<usize, StorageError>;
}

/// Store contract for the append-only completion log
pub trait CompletionStore {
    /// Full completion history for one habit, oldest first
    fn completions_for_habit(&self, habit_id: &HabitId) -> Result<Vec<Completion>, StorageError>;

    /// One habit's completions with dates in [start, end], oldest first
    fn completions_for_habit_in_range(
        &self,
        habit_id: &HabitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError>;

    /// The day's completion for a habit, if any
    fn completion_on_day(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
    ) -> Result<Option<Completion>, StorageError>;

    /// All of a user's completions with dates in [start, end], oldest first;
    /// completions of soft-deleted habits are excluded
    fn completions_for_user_in_range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError>;

    /// Record a check-in as a single atomic upsert
    ///
    /// Inserts the (habit, day) row if missing, otherwise accumulates `value`
    /// into the existing row. Returns the canonical row either way. This is
    /// what keeps repeated same-day check-ins from producing duplicates.
    fn upsert_completion(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        value: u32,
    ) -> Result<Completion, StorageError>;

    /// Remove one completion record (the "uncheck" operation)
    fn delete_completion(&self, completion_id: &CompletionId) -> Result<(), StorageError>;
}
