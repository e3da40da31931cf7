/// Check-in and uncheck operations
///
/// A check-in is a single atomic upsert keyed on the (habit, day) uniqueness
/// invariant: repeated same-day check-ins accumulate into one record. There
/// is deliberately no find-or-create read/write sequence here.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{compute_streaks, HabitDayStatus, StreakSummary};
use crate::domain::{Completion, DomainError, HabitId, UserId};
use crate::storage::{CompletionStore, HabitStore};
use crate::ServiceError;

/// Result of a check-in: the written record plus derived state
#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub completion: Completion,
    pub status: HabitDayStatus,
    pub streak: StreakSummary,
}

/// Log a completion for a habit
///
/// `date` defaults to `today` and may not lie in the future; `value`
/// defaults to 1. Returns the day's accumulated status and the recomputed
/// streaks.
pub fn check_in<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
    date: Option<NaiveDate>,
    value: Option<u32>,
    today: NaiveDate,
) -> Result<CheckInOutcome, ServiceError> {
    let habit = storage.get_habit(&user_id, &habit_id)?;

    let day = date.unwrap_or(today);
    if day > today {
        return Err(DomainError::InvalidDate(format!(
            "cannot log completions for the future date {}",
            day
        ))
        .into());
    }

    let value = value.unwrap_or(1);
    Completion::validate_value(value)?;

    let completion = storage.upsert_completion(&habit_id, day, value)?;
    tracing::debug!(
        "check-in for {:?} on {}: value now {}",
        habit.name,
        day,
        completion.value
    );

    let history = storage.completions_for_habit(&habit_id)?;
    let streak = compute_streaks(&history, today);

    let completed = habit.goal.is_met_by(completion.value);
    let status = HabitDayStatus {
        completed,
        progress: completion.value,
        completion_id: Some(completion.id),
        habit,
    };

    Ok(CheckInOutcome {
        completion,
        status,
        streak,
    })
}

/// Remove the day's completion for a habit, if one exists
///
/// Returns whether a record was actually removed.
pub fn uncheck<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
    day: NaiveDate,
) -> Result<bool, ServiceError> {
    // Ownership check; also rejects soft-deleted habits.
    storage.get_habit(&user_id, &habit_id)?;

    match storage.completion_on_day(&habit_id, day)? {
        Some(completion) => {
            storage.delete_completion(&completion.id)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
