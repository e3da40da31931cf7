/// Completion reconciler: merge due habits with logged completions
///
/// A pure merge over already-fetched data. Fetching the due habits and the
/// day's completions is the storage layer's job; this component only joins
/// them and derives per-habit status.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{Completion, CompletionId, Goal, Habit, HabitId};

/// Per-habit completion status for one calendar date
#[derive(Debug, Clone, Serialize)]
pub struct HabitDayStatus {
    pub habit: Habit,
    /// Whether the habit's goal is satisfied for this date
    pub completed: bool,
    /// Accumulated value for the date (0 when nothing is logged)
    pub progress: u32,
    /// The backing completion record, if one exists
    pub completion_id: Option<CompletionId>,
}

impl HabitDayStatus {
    /// Remaining amount for target goals; None for yes/no goals
    pub fn remaining(&self) -> Option<u32> {
        match &self.habit.goal {
            Goal::Target { target, .. } => Some(target.saturating_sub(self.progress)),
            _ => None,
        }
    }
}

/// Merge a day's due habits with its logged completions
///
/// The join is keyed by habit id, O(habits + completions); completions whose
/// date differs from `date` are ignored so callers may pass a wider slice.
pub fn reconcile(
    due_habits: &[Habit],
    completions: &[Completion],
    date: NaiveDate,
) -> Vec<HabitDayStatus> {
    let by_habit: HashMap<HabitId, &Completion> = completions
        .iter()
        .filter(|c| c.date == date)
        .map(|c| (c.habit_id, c))
        .collect();

    due_habits
        .iter()
        .map(|habit| {
            let matched = by_habit.get(&habit.id);
            let progress = matched.map(|c| c.value).unwrap_or(0);
            let completed = match &habit.goal {
                Goal::YesNo => matched.is_some() && progress >= 1,
                Goal::Target { target, .. } => progress >= *target,
                Goal::Unsupported => false,
            };
            HabitDayStatus {
                habit: habit.clone(),
                completed,
                progress,
                completion_id: matched.map(|c| c.id),
            }
        })
        .collect()
}
