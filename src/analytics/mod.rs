/// Pure completion-analytics engine
///
/// Everything in this module is a synchronous, deterministic computation over
/// in-memory data already fetched from the stores: the reconciler, the streak
/// calculator, the heatmap/chart series and the dashboard summaries. The
/// reference day ("today") is always an explicit parameter.

pub mod reconcile;
pub mod series;
pub mod streak;
pub mod summary;

pub use reconcile::{reconcile, HabitDayStatus};
pub use series::{heatmap, monthly_series, HeatmapDay, MonthBucket, CHART_MONTHS, HEATMAP_WINDOW_DAYS};
pub use streak::{compute_streaks, StreakSummary};
pub use summary::{
    build_dashboard, build_day_view, build_month_view, completion_rate, rate_color, Dashboard,
    DashboardHabit, DayView, MonthCell, RATE_COLORS,
};
