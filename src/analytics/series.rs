/// Aggregation engine: heatmap and monthly time series
///
/// Two independent pure transforms over a single habit's completion history.
/// Both are O(n) over the completions plus the zero-fill pass.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{calendar, Completion};

/// Default heatmap window: the most recent year of days
pub const HEATMAP_WINDOW_DAYS: u32 = 365;

/// How many monthly buckets the chart series keeps
pub const CHART_MONTHS: usize = 12;

/// One day of the heatmap series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub day: NaiveDate,
    pub count: u32,
}

/// One month bucket of the chart series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// Short label, e.g. "Jan 2024"
    pub label: String,
    pub total: u32,
}

/// Daily completion counts for the `window_days` days ending at `today`
///
/// Fixed length, ordered oldest to newest, zero-filled where no completion
/// exists. Values are summed per day, though the (habit, day) uniqueness
/// invariant normally means one record per day.
pub fn heatmap(completions: &[Completion], window_days: u32, today: NaiveDate) -> Vec<HeatmapDay> {
    let mut by_day: HashMap<NaiveDate, u32> = HashMap::with_capacity(completions.len());
    for c in completions {
        *by_day.entry(c.date).or_insert(0) += c.value;
    }

    let start = today - Duration::days(i64::from(window_days) - 1);
    (0..window_days)
        .map(|offset| {
            let day = start + Duration::days(i64::from(offset));
            HeatmapDay {
                day,
                count: by_day.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Monthly totals over the whole history, most recent `CHART_MONTHS` buckets
///
/// Completions are grouped by (year, month) and summed; the result is
/// chronological. Months with no completions between two active months are
/// not fabricated - the series reflects logged data only.
pub fn monthly_series(completions: &[Completion]) -> Vec<MonthBucket> {
    let mut by_month: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for c in completions {
        *by_month.entry((c.date.year(), c.date.month())).or_insert(0) += c.value;
    }

    let skip = by_month.len().saturating_sub(CHART_MONTHS);
    by_month
        .into_iter()
        .skip(skip)
        .map(|((year, month), total)| MonthBucket {
            label: calendar::month_label(year, month),
            total,
        })
        .collect()
}
