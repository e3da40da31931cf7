/// Dashboard-level views: one date, one month, or today's overview
///
/// These functions fetch the snapshot (active habits + the relevant
/// completion range) and hand it to the pure summary builder; the reference
/// day stays an explicit parameter.

use chrono::{Duration, NaiveDate};

use crate::analytics::{
    build_dashboard, build_day_view, build_month_view, Dashboard, DayView, MonthCell,
};
use crate::domain::{calendar, DomainError, UserId};
use crate::storage::{CompletionStore, HabitStore};
use crate::ServiceError;

/// Status of every active habit on one calendar date
pub fn day_view<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<DayView, ServiceError> {
    let habits = storage.list_habits(&user_id, false)?;
    let completions = storage.completions_for_user_in_range(&user_id, date, date)?;
    Ok(build_day_view(&habits, &completions, date, today))
}

/// Per-day completion-rate heatmap for one (year, month)
pub fn month_view<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    year: i32,
    month: u32,
) -> Result<Vec<MonthCell>, ServiceError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DomainError::InvalidDate(format!("invalid month {}-{:02}", year, month))
    })?;
    let days = calendar::days_in_month(year, month).ok_or_else(|| {
        DomainError::InvalidDate(format!("invalid month {}-{:02}", year, month))
    })?;
    let last = first + Duration::days(i64::from(days) - 1);

    let habits = storage.list_habits(&user_id, false)?;
    let completions = storage.completions_for_user_in_range(&user_id, first, last)?;
    Ok(build_month_view(&habits, &completions, year, month)?)
}

/// Today's overview across all active habits
pub fn dashboard<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    today: NaiveDate,
) -> Result<Dashboard, ServiceError> {
    let habits = storage.list_habits(&user_id, false)?;
    let completions = storage.completions_for_user_in_range(&user_id, today, today)?;
    Ok(build_dashboard(&habits, &completions, today))
}
