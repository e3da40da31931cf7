/// Use-case layer tying the stores to the pure analytics engine
///
/// Every function here is generic over the store traits and takes the
/// reference day explicitly; only the `HabitTracker` facade in the crate
/// root reads the wall clock.

pub mod checkin;
pub mod habits;
pub mod stats;
pub mod views;

pub use checkin::{check_in, uncheck, CheckInOutcome};
pub use habits::{
    archive_habit, create_habit, purge_deleted, restore_habit, soft_delete_habit, update_habit,
    CreateHabitParams, UpdateHabitParams,
};
pub use stats::{habit_stats, HabitStats};
pub use views::{dashboard, day_view, month_view};
