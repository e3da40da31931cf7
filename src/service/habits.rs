/// Habit lifecycle operations: create, edit, archive, soft delete, purge
///
/// Thin orchestration over the domain constructors and the habit store.
/// Validation happens in the domain layer before anything is persisted.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Frequency, Goal, Habit, HabitId, UserId};
use crate::storage::HabitStore;
use crate::ServiceError;

/// Input for creating a habit
#[derive(Debug, Clone)]
pub struct CreateHabitParams {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub frequency: Frequency,
    pub goal: Goal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for a partial habit edit
///
/// Outer None leaves a field unchanged; `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default)]
pub struct UpdateHabitParams {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub goal: Option<Goal>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

/// Validate and persist a new habit
pub fn create_habit<S: HabitStore>(
    storage: &S,
    user_id: UserId,
    params: CreateHabitParams,
) -> Result<Habit, ServiceError> {
    let habit = Habit::new(
        user_id,
        params.name,
        params.description,
        params.color,
        params.frequency,
        params.goal,
        params.start_date,
        params.end_date,
    )?;
    storage.create_habit(&habit)?;

    tracing::info!("created habit {:?} ({})", habit.name, habit.id);
    Ok(habit)
}

/// Apply a partial edit to an existing habit
pub fn update_habit<S: HabitStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: UpdateHabitParams,
) -> Result<Habit, ServiceError> {
    let mut habit = storage.get_habit(&user_id, &habit_id)?;
    habit.update(
        params.name,
        params.description,
        params.color,
        params.frequency,
        params.goal,
        params.start_date,
        params.end_date,
    )?;
    storage.update_habit(&habit)?;
    Ok(habit)
}

/// Archive a habit; completion history is kept and it can be restored
pub fn archive_habit<S: HabitStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<(), ServiceError> {
    storage.archive_habit(&user_id, &habit_id)?;
    Ok(())
}

/// Bring an archived habit back into the active set
pub fn restore_habit<S: HabitStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<(), ServiceError> {
    storage.restore_habit(&user_id, &habit_id)?;
    Ok(())
}

/// Soft-delete a habit as of `now`; hidden immediately, purged after the
/// retention period
pub fn soft_delete_habit<S: HabitStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    storage.soft_delete_habit(&user_id, &habit_id, now)?;
    Ok(())
}

/// Permanently remove habits whose soft-delete is past the retention period
pub fn purge_deleted<S: HabitStore>(storage: &S, now: DateTime<Utc>) -> Result<usize, ServiceError> {
    Ok(storage.purge_deleted(now)?)
}
