/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, Completion), the schedule
/// and goal sum types, calendar conventions, and their validation rules.

pub mod calendar;
pub mod completion;
pub mod habit;
pub mod types;

// Re-export public types for easy access
pub use completion::*;
pub use habit::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    #[error("invalid active window: {0}")]
    InvalidWindow(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}
