/// Habit scheduling and completion-analytics engine
///
/// The crate is layered: `domain` holds the entities and due-date logic,
/// `analytics` the pure computations (reconciliation, streaks, series,
/// summaries), `storage` the store contracts plus the SQLite implementation,
/// and `service` the use cases that tie them together. The `HabitTracker`
/// facade below is the call boundary where the reference day defaults to the
/// current UTC calendar day; everything underneath takes it as a parameter.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod service;
pub mod storage;

pub use analytics::{
    Dashboard, DayView, HabitDayStatus, HeatmapDay, MonthBucket, MonthCell, StreakSummary,
};
pub use domain::{
    Completion, CompletionId, DomainError, Frequency, Goal, Habit, HabitId, UserId,
};
pub use service::{CheckInOutcome, CreateHabitParams, HabitStats, UpdateHabitParams};
pub use storage::{CompletionStore, HabitStore, SqliteStorage, StorageError};

/// Errors surfaced by the service layer and the facade
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Single-user entry point over a SQLite database
///
/// Wraps the storage with an owner id and supplies the current UTC day to
/// the otherwise date-explicit service functions.
pub struct HabitTracker {
    storage: SqliteStorage,
    user_id: UserId,
}

impl HabitTracker {
    /// Open (or create) the database at `db_path`
    pub fn open(db_path: PathBuf, user_id: UserId) -> Result<Self, ServiceError> {
        let storage = SqliteStorage::new(db_path)?;
        Ok(Self { storage, user_id })
    }

    /// In-memory tracker, useful for tests and experiments
    pub fn in_memory(user_id: UserId) -> Result<Self, ServiceError> {
        let storage = SqliteStorage::in_memory()?;
        Ok(Self { storage, user_id })
    }

    /// The evaluation instant's calendar day (UTC)
    ///
    /// This is the only place the crate reads the wall clock for day logic.
    fn today(&self) -> NaiveDate {
        domain::calendar::normalize_to_day(Utc::now())
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    // Habit lifecycle

    pub fn create_habit(&self, params: CreateHabitParams) -> Result<Habit, ServiceError> {
        service::create_habit(&self.storage, self.user_id, params)
    }

    pub fn update_habit(
        &self,
        habit_id: HabitId,
        params: UpdateHabitParams,
    ) -> Result<Habit, ServiceError> {
        service::update_habit(&self.storage, self.user_id, habit_id, params)
    }

    pub fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, ServiceError> {
        Ok(self.storage.list_habits(&self.user_id, include_archived)?)
    }

    pub fn get_habit(&self, habit_id: HabitId) -> Result<Habit, ServiceError> {
        Ok(self.storage.get_habit(&self.user_id, &habit_id)?)
    }

    pub fn archive_habit(&self, habit_id: HabitId) -> Result<(), ServiceError> {
        service::archive_habit(&self.storage, self.user_id, habit_id)
    }

    pub fn restore_habit(&self, habit_id: HabitId) -> Result<(), ServiceError> {
        service::restore_habit(&self.storage, self.user_id, habit_id)
    }

    pub fn soft_delete_habit(&self, habit_id: HabitId) -> Result<(), ServiceError> {
        service::soft_delete_habit(&self.storage, self.user_id, habit_id, Utc::now())
    }

    pub fn purge_deleted(&self) -> Result<usize, ServiceError> {
        service::purge_deleted(&self.storage, Utc::now())
    }

    // Check-ins

    pub fn check_in(
        &self,
        habit_id: HabitId,
        date: Option<NaiveDate>,
        value: Option<u32>,
    ) -> Result<CheckInOutcome, ServiceError> {
        service::check_in(&self.storage, self.user_id, habit_id, date, value, self.today())
    }

    pub fn uncheck(&self, habit_id: HabitId, date: Option<NaiveDate>) -> Result<bool, ServiceError> {
        let day = date.unwrap_or_else(|| self.today());
        service::uncheck(&self.storage, self.user_id, habit_id, day)
    }

    // Views and statistics

    pub fn habit_stats(&self, habit_id: HabitId) -> Result<HabitStats, ServiceError> {
        service::habit_stats(&self.storage, self.user_id, habit_id, self.today())
    }

    pub fn day_view(&self, date: NaiveDate) -> Result<DayView, ServiceError> {
        service::day_view(&self.storage, self.user_id, date, self.today())
    }

    pub fn today_view(&self) -> Result<DayView, ServiceError> {
        self.day_view(self.today())
    }

    pub fn month_view(&self, year: i32, month: u32) -> Result<Vec<MonthCell>, ServiceError> {
        service::month_view(&self.storage, self.user_id, year, month)
    }

    pub fn dashboard(&self) -> Result<Dashboard, ServiceError> {
        service::dashboard(&self.storage, self.user_id, self.today())
    }
}
