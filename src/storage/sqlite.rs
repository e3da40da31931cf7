/// SQLite implementation of the habit and completion stores
///
/// Handles all SQL plus the conversion between database rows and domain
/// types. Frequency and goal are persisted as tagged JSON; unrecognized tags
/// deserialize to the fail-closed `Unsupported` variants with a
/// data-integrity warning instead of poisoning whole-list queries.

use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{Completion, CompletionId, Frequency, Goal, Habit, HabitId, UserId};
use crate::storage::{
    migrations, CompletionStore, HabitStore, StorageError, RETENTION_DAYS,
};

const HABIT_COLUMNS: &str = "id, user_id, name, description, color, frequency, goal, \
     start_date, end_date, is_active, created_at, deleted_at";

const COMPLETION_COLUMNS: &str = "id, habit_id, date, value, logged_at";

/// SQLite-backed storage implementing both store traits
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and run pending migrations
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// In-memory database, used by tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("failed to open database: {}", e)))?;
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("failed to enable foreign keys: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }
}

fn invalid_text(idx: usize, what: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, what.to_string(), rusqlite::types::Type::Text)
}

fn parse_day(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid_text(idx, "invalid date"))
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid_text(idx, "invalid datetime"))
}

/// Deserialize a stored schedule, falling back to the never-due variant
fn parse_frequency(raw: &str) -> Frequency {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        tracing::warn!("unreadable schedule {:?} in habits row ({}); treating as never due", raw, err);
        Frequency::Unsupported
    })
}

/// Deserialize a stored goal, falling back to the never-completed variant
fn parse_goal(raw: &str) -> Goal {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        tracing::warn!("unreadable goal {:?} in habits row ({}); treating as never completed", raw, err);
        Goal::Unsupported
    })
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let id_str: String = row.get(0)?;
    let id = HabitId::from_string(&id_str).map_err(|_| invalid_text(0, "invalid UUID"))?;

    let user_str: String = row.get(1)?;
    let user_id = UserId::from_string(&user_str).map_err(|_| invalid_text(1, "invalid UUID"))?;

    let frequency_json: String = row.get(5)?;
    let goal_json: String = row.get(6)?;

    let start_date = row
        .get::<_, Option<String>>(7)?
        .map(|s| parse_day(7, &s))
        .transpose()?;
    let end_date = row
        .get::<_, Option<String>>(8)?
        .map(|s| parse_day(8, &s))
        .transpose()?;

    let created_at_str: String = row.get(10)?;
    let created_at = parse_timestamp(10, &created_at_str)?;
    let deleted_at = row
        .get::<_, Option<String>>(11)?
        .map(|s| parse_timestamp(11, &s))
        .transpose()?;

    Ok(Habit::from_existing(
        id,
        user_id,
        row.get(2)?, // name
        row.get(3)?, // description
        row.get(4)?, // color
        parse_frequency(&frequency_json),
        parse_goal(&goal_json),
        start_date,
        end_date,
        row.get(9)?, // is_active
        created_at,
        deleted_at,
    ))
}

fn completion_from_row(row: &Row<'_>) -> rusqlite::Result<Completion> {
    let id_str: String = row.get(0)?;
    let id = CompletionId::from_string(&id_str).map_err(|_| invalid_text(0, "invalid UUID"))?;

    let habit_id_str: String = row.get(1)?;
    let habit_id =
        HabitId::from_string(&habit_id_str).map_err(|_| invalid_text(1, "invalid UUID"))?;

    let date_str: String = row.get(2)?;
    let date = parse_day(2, &date_str)?;

    let logged_at_str: String = row.get(4)?;
    let logged_at = parse_timestamp(4, &logged_at_str)?;

    Ok(Completion::from_existing(
        id,
        habit_id,
        date,
        row.get(3)?, // value
        logged_at,
    ))
}

impl HabitStore for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;
        let goal_json = serde_json::to_string(&habit.goal)?;

        self.conn.execute(
            "INSERT INTO habits (
                id, user_id, name, description, color, frequency, goal,
                start_date, end_date, is_active, created_at, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.color,
                frequency_json,
                goal_json,
                habit.start_date.map(|d| d.to_string()),
                habit.end_date.map(|d| d.to_string()),
                habit.is_active,
                habit.created_at.to_rfc3339(),
                habit.deleted_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        tracing::debug!("created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            HABIT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let result = stmt.query_row(
            params![habit_id.to_string(), user_id.to_string()],
            habit_from_row,
        );

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;
        let goal_json = serde_json::to_string(&habit.goal)?;

        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?3,
                description = ?4,
                color = ?5,
                frequency = ?6,
                goal = ?7,
                start_date = ?8,
                end_date = ?9,
                is_active = ?10,
                deleted_at = ?11
             WHERE id = ?1 AND user_id = ?2",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.color,
                frequency_json,
                goal_json,
                habit.start_date.map(|d| d.to_string()),
                habit.end_date.map(|d| d.to_string()),
                habit.is_active,
                habit.deleted_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn list_habits(
        &self,
        user_id: &UserId,
        include_archived: bool,
    ) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!(
            "SELECT {} FROM habits WHERE user_id = ?1 AND deleted_at IS NULL",
            HABIT_COLUMNS
        );
        if !include_archived {
            sql.push_str(" AND is_active = 1");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map(params![user_id.to_string()], habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn archive_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = 0
             WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![habit_id.to_string(), user_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("archived habit: {}", habit_id);
        Ok(())
    }

    fn restore_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = 1
             WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![habit_id.to_string(), user_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("restored habit: {}", habit_id);
        Ok(())
    }

    fn soft_delete_habit(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        deleted_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET deleted_at = ?3
             WHERE id = ?1 AND user_id = ?2 AND deleted_at IS NULL",
            params![
                habit_id.to_string(),
                user_id.to_string(),
                deleted_at.to_rfc3339()
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("soft-deleted habit: {}", habit_id);
        Ok(())
    }

    fn purge_deleted(&self, now: DateTime<Utc>) -> Result<usize, StorageError> {
        let cutoff = (now - Duration::days(RETENTION_DAYS)).to_rfc3339();

        // Completions first; the foreign key would reject orphaning them.
        self.conn.execute(
            "DELETE FROM completions WHERE habit_id IN (
                SELECT id FROM habits WHERE deleted_at IS NOT NULL AND deleted_at < ?1
            )",
            params![cutoff],
        )?;

        let purged = self.conn.execute(
            "DELETE FROM habits WHERE deleted_at IS NOT NULL AND deleted_at < ?1",
            params![cutoff],
        )?;

        if purged > 0 {
            tracing::info!("purged {} habit(s) past the retention period", purged);
        }
        Ok(purged)
    }
}

impl CompletionStore for SqliteStorage {
    fn completions_for_habit(&self, habit_id: &HabitId) -> Result<Vec<Completion>, StorageError> {
        let sql = format!(
            "SELECT {} FROM completions WHERE habit_id = ?1 ORDER BY date ASC",
            COMPLETION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(params![habit_id.to_string()], completion_from_row)?;

        let mut completions = Vec::new();
        for completion in iter {
            completions.push(completion?);
        }
        Ok(completions)
    }

    fn completions_for_habit_in_range(
        &self,
        habit_id: &HabitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError> {
        let sql = format!(
            "SELECT {} FROM completions
             WHERE habit_id = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC",
            COMPLETION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map(
            params![habit_id.to_string(), start.to_string(), end.to_string()],
            completion_from_row,
        )?;

        let mut completions = Vec::new();
        for completion in iter {
            completions.push(completion?);
        }
        Ok(completions)
    }

    fn completion_on_day(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
    ) -> Result<Option<Completion>, StorageError> {
        let sql = format!(
            "SELECT {} FROM completions WHERE habit_id = ?1 AND date = ?2",
            COMPLETION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let result = stmt.query_row(
            params![habit_id.to_string(), day.to_string()],
            completion_from_row,
        );

        match result {
            Ok(completion) => Ok(Some(completion)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn completions_for_user_in_range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.habit_id, c.date, c.value, c.logged_at
             FROM completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE h.user_id = ?1 AND h.deleted_at IS NULL
               AND c.date BETWEEN ?2 AND ?3
             ORDER BY c.date ASC",
        )?;
        let iter = stmt.query_map(
            params![user_id.to_string(), start.to_string(), end.to_string()],
            completion_from_row,
        )?;

        let mut completions = Vec::new();
        for completion in iter {
            completions.push(completion?);
        }
        Ok(completions)
    }

    fn upsert_completion(
        &self,
        habit_id: &HabitId,
        day: NaiveDate,
        value: u32,
    ) -> Result<Completion, StorageError> {
        let id = CompletionId::new();
        let logged_at = Utc::now();

        // One statement, keyed on the unique (habit_id, date) index: a
        // concurrent double check-in accumulates instead of duplicating.
        self.conn.execute(
            "INSERT INTO completions (id, habit_id, date, value, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (habit_id, date)
             DO UPDATE SET value = value + excluded.value, logged_at = excluded.logged_at",
            params![
                id.to_string(),
                habit_id.to_string(),
                day.to_string(),
                value,
                logged_at.to_rfc3339(),
            ],
        )?;

        // Read back the canonical row; on conflict the original id survives.
        self.completion_on_day(habit_id, day)?
            .ok_or_else(|| StorageError::CompletionNotFound {
                completion_id: id.to_string(),
            })
    }

    fn delete_completion(&self, completion_id: &CompletionId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM completions WHERE id = ?1",
            params![completion_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::CompletionNotFound {
                completion_id: completion_id.to_string(),
            });
        }

        tracing::debug!("deleted completion: {}", completion_id);
        Ok(())
    }
}
