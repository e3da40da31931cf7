/// Per-habit statistics bundle for the detail view
///
/// Pulls one habit's full history and derives streaks plus both aggregation
/// series in a single pass over the data.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{
    compute_streaks, heatmap, monthly_series, HeatmapDay, MonthBucket, HEATMAP_WINDOW_DAYS,
};
use crate::domain::{Habit, HabitId, UserId};
use crate::storage::{CompletionStore, HabitStore};
use crate::ServiceError;

/// Everything the habit detail screen needs
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    pub habit: Habit,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Daily counts for the last year, oldest first
    pub heatmap: Vec<HeatmapDay>,
    /// Monthly totals, most recent twelve buckets
    pub chart: Vec<MonthBucket>,
}

pub fn habit_stats<S: HabitStore + CompletionStore>(
    storage: &S,
    user_id: UserId,
    habit_id: HabitId,
    today: NaiveDate,
) -> Result<HabitStats, ServiceError> {
    let habit = storage.get_habit(&user_id, &habit_id)?;
    let history = storage.completions_for_habit(&habit_id)?;

    let streaks = compute_streaks(&history, today);

    Ok(HabitStats {
        current_streak: streaks.current,
        longest_streak: streaks.longest,
        total_completions: history.len() as u32,
        heatmap: heatmap(&history, HEATMAP_WINDOW_DAYS, today),
        chart: monthly_series(&history),
        habit,
    })
}
