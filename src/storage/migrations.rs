/// Database migration management
///
/// This module handles creating and updating the SQLite schema. It ensures
/// the database has all required tables and indexes, including the unique
/// (habit_id, date) index that backs the completion uniqueness invariant.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when adding new migrations.
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// Creates all required tables and indexes if they don't exist and records
/// the schema version for future migrations. Idempotent.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // No version record yet means a fresh database

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: habits and completions tables plus indexes
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            color TEXT,
            frequency TEXT NOT NULL,
            goal TEXT NOT NULL,
            start_date TEXT,
            end_date TEXT,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TEXT NOT NULL,
            deleted_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS completions (
            id TEXT PRIMARY KEY,
            habit_id TEXT NOT NULL,
            date TEXT NOT NULL,
            value INTEGER NOT NULL DEFAULT 1,
            logged_at TEXT NOT NULL,
            FOREIGN KEY (habit_id) REFERENCES habits (id)
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: created initial database schema");
    Ok(())
}

fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Listing a user's habits is the most common query.
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habits_user
         ON habits (user_id, is_active, created_at)",
        [],
    )?;

    // One completion per (habit, day); repeated check-ins must update the
    // existing row, and this index is what the upsert conflicts against.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_completions_habit_date
         ON completions (habit_id, date)",
        [],
    )?;

    // Date-range scans for the day/month views.
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_completions_date
         ON completions (date)",
        [],
    )?;

    Ok(())
}
