/// Summary builder: dashboard-level aggregates across a user's habit set
///
/// Combines due-date evaluation, reconciliation and the series transforms for
/// two call patterns: a single-date day view and a per-day month heatmap.
/// Every call recomputes from the snapshot passed in; no state is retained.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::analytics::reconcile::{reconcile, HabitDayStatus};
use crate::domain::{DomainError, Completion, Habit};

/// Five-bucket color scale for the month heatmap
///
/// Fixed thresholds, not configurable per habit:
/// 0% -> lightest, then (0,25), [25,50), [50,75), [75,100].
pub const RATE_COLORS: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];

/// Map a completion rate (rounded percent) to its heatmap color
pub fn rate_color(rate: u8) -> &'static str {
    match rate {
        0 => RATE_COLORS[0],
        1..=24 => RATE_COLORS[1],
        25..=49 => RATE_COLORS[2],
        50..=74 => RATE_COLORS[3],
        _ => RATE_COLORS[4],
    }
}

/// Rounded percentage of completed over total; 0 when nothing is due
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Per-date status of a user's habit set
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub is_past: bool,
    pub is_today: bool,
    pub is_future: bool,
    /// Habits due on this date
    pub habits_count: usize,
    pub completed_count: usize,
    /// Rounded percent of due habits completed
    pub completion_rate: u8,
    pub habits: Vec<HabitDayStatus>,
}

/// One day of the month heatmap
#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub completion_rate: u8,
    pub completed_count: usize,
    pub total_count: usize,
    pub color: &'static str,
}

/// One habit's slice of the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardHabit {
    pub habit: Habit,
    pub due_today: bool,
    pub completed_today: bool,
    pub today_value: u32,
}

/// Today-centric summary across all active habits
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub habits: Vec<DashboardHabit>,
    pub total_habits: usize,
    pub completed_today: usize,
    /// Rounded percent of today's due habits completed
    pub completion_rate: u8,
}

/// Build the status of one date across a habit set
///
/// `date` is the date being viewed (any day of the calendar); `today` is the
/// evaluation instant's calendar day and only feeds the past/today/future
/// flags.
pub fn build_day_view(
    habits: &[Habit],
    completions: &[Completion],
    date: NaiveDate,
    today: NaiveDate,
) -> DayView {
    let due: Vec<Habit> = habits.iter().filter(|h| h.is_due_on(date)).cloned().collect();
    let statuses = reconcile(&due, completions, date);
    let completed_count = statuses.iter().filter(|s| s.completed).count();

    DayView {
        date,
        is_past: date < today,
        is_today: date == today,
        is_future: date > today,
        habits_count: due.len(),
        completed_count,
        completion_rate: completion_rate(completed_count, due.len()),
        habits: statuses,
    }
}

/// Build the per-day completion heatmap for one (year, month)
///
/// Each day is evaluated independently: habits active and scheduled on that
/// day form the denominator, so a habit archived before the call is excluded
/// from every day (archival state is read at call time, not replayed).
pub fn build_month_view(
    habits: &[Habit],
    completions: &[Completion],
    year: i32,
    month: u32,
) -> Result<Vec<MonthCell>, DomainError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::InvalidDate(format!("invalid month {}-{:02}", year, month)))?;
    let days = crate::domain::calendar::days_in_month(year, month)
        .ok_or_else(|| DomainError::InvalidDate(format!("invalid month {}-{:02}", year, month)))?;

    // Group once so each day's reconcile sees only its own slice.
    let mut by_day: HashMap<NaiveDate, Vec<Completion>> = HashMap::new();
    for c in completions {
        by_day.entry(c.date).or_default().push(c.clone());
    }

    let cells = (0..days)
        .map(|offset| {
            let date = first + Duration::days(i64::from(offset));
            let due: Vec<Habit> = habits.iter().filter(|h| h.is_due_on(date)).cloned().collect();
            let day_completions = by_day.get(&date).map(|v| v.as_slice()).unwrap_or(&[]);
            let statuses = reconcile(&due, day_completions, date);
            let completed_count = statuses.iter().filter(|s| s.completed).count();
            let rate = completion_rate(completed_count, due.len());
            MonthCell {
                date,
                completion_rate: rate,
                completed_count,
                total_count: due.len(),
                color: rate_color(rate),
            }
        })
        .collect();

    Ok(cells)
}

/// Build the dashboard summary for the evaluation day
///
/// All (non-deleted, active) habits appear; the completion counters only
/// consider habits actually due today.
pub fn build_dashboard(habits: &[Habit], completions: &[Completion], today: NaiveDate) -> Dashboard {
    let day = build_day_view(habits, completions, today, today);
    let status_by_id: HashMap<_, _> = day.habits.iter().map(|s| (s.habit.id, s)).collect();

    let dashboard_habits = habits
        .iter()
        .filter(|h| h.is_active && !h.is_deleted())
        .map(|h| match status_by_id.get(&h.id) {
            Some(status) => DashboardHabit {
                habit: h.clone(),
                due_today: true,
                completed_today: status.completed,
                today_value: status.progress,
            },
            None => DashboardHabit {
                habit: h.clone(),
                due_today: false,
                completed_today: false,
                today_value: 0,
            },
        })
        .collect::<Vec<_>>();

    Dashboard {
        total_habits: dashboard_habits.len(),
        completed_today: day.completed_count,
        completion_rate: day.completion_rate,
        habits: dashboard_habits,
    }
}
