/// Command line interface for the habit tracker
///
/// Sets up logging, resolves the database location and dispatches the
/// subcommands onto the `HabitTracker` facade. The CLI runs single-user: all
/// records belong to a fixed local owner id.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

use habit_tracker::{
    CreateHabitParams, Frequency, Goal, Habit, HabitTracker, UserId,
};

/// All CLI records belong to this fixed local owner
const LOCAL_USER: UserId = UserId(Uuid::nil());

#[derive(Parser, Debug)]
#[command(name = "habits", version, about = "Track recurring habits from the command line")]
struct Args {
    /// Path to the SQLite database file (defaults to the platform data dir)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new habit
    Add {
        name: String,
        /// Schedule on specific weekdays, e.g. "mon,wed,fri" (default: daily)
        #[arg(long)]
        days: Option<String>,
        /// Daily target amount (requires --unit)
        #[arg(long)]
        target: Option<u32>,
        /// Unit for the target, e.g. "glasses"
        #[arg(long)]
        unit: Option<String>,
        /// Display color as #rrggbb
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// First day the habit is due (inclusive)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day the habit is due (inclusive)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// List habits
    List {
        /// Include archived habits
        #[arg(long)]
        all: bool,
    },
    /// Log a completion
    Check {
        habit: String,
        /// Day to log for (defaults to today, must not be in the future)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Amount to add toward a target goal (defaults to 1)
        #[arg(long)]
        value: Option<u32>,
    },
    /// Remove a day's completion
    Uncheck {
        habit: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Streaks, heatmap and chart data for one habit
    Stats { habit: String },
    /// Show all habits' status for a date (defaults to today)
    Day { date: Option<NaiveDate> },
    /// Completion-rate heatmap for a month, e.g. "2024-06" (defaults to the
    /// current month)
    Month { month: Option<String> },
    /// Today's overview
    Dashboard,
    /// Archive a habit (restorable, history kept)
    Archive { habit: String },
    /// Restore an archived habit
    Restore { habit: String },
    /// Soft-delete a habit (purged after the retention period)
    Remove { habit: String },
    /// Permanently remove habits past the retention period
    Purge,
}

fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);
    let dir = base.join("habit-tracker");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("habits.db"))
}

/// Parse "mon,wed,fri" (names or 0-6 numbers) into Monday=0 day numbers
fn parse_days(spec: &str) -> Result<Vec<u8>, String> {
    spec.split(',')
        .map(|token| {
            let token = token.trim().to_lowercase();
            match token.as_str() {
                "mon" | "monday" => Ok(0),
                "tue" | "tuesday" => Ok(1),
                "wed" | "wednesday" => Ok(2),
                "thu" | "thursday" => Ok(3),
                "fri" | "friday" => Ok(4),
                "sat" | "saturday" => Ok(5),
                "sun" | "sunday" => Ok(6),
                _ => token
                    .parse::<u8>()
                    .map_err(|_| format!("unrecognized day {:?}", token)),
            }
        })
        .collect()
}

/// Parse "YYYY-MM" into (year, month)
fn parse_month(spec: &str) -> Result<(i32, u32), String> {
    let (year, month) = spec
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got {:?}", spec))?;
    let year = year.parse().map_err(|_| format!("invalid year in {:?}", spec))?;
    let month = month.parse().map_err(|_| format!("invalid month in {:?}", spec))?;
    Ok((year, month))
}

/// Find a habit by exact id, id prefix or case-insensitive name
fn resolve_habit(tracker: &HabitTracker, query: &str) -> Result<Habit, Box<dyn std::error::Error>> {
    let habits = tracker.list_habits(true)?;
    let lowered = query.to_lowercase();

    let matches: Vec<&Habit> = habits
        .iter()
        .filter(|h| {
            h.name.to_lowercase() == lowered || h.id.to_string().starts_with(&lowered)
        })
        .collect();

    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => Err(format!("no habit matches {:?}", query).into()),
        _ => Err(format!("{:?} is ambiguous; use the habit id", query).into()),
    }
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_tracker={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };
    info!("using database at: {}", db_path.display());

    let tracker = HabitTracker::open(db_path, LOCAL_USER)?;

    match args.command {
        Command::Add {
            name,
            days,
            target,
            unit,
            color,
            description,
            start,
            end,
        } => {
            let frequency = match days {
                Some(spec) => Frequency::specific_days(parse_days(&spec)?),
                None => Frequency::Daily,
            };
            let goal = match (target, unit) {
                (Some(target), Some(unit)) => Goal::Target { target, unit },
                (Some(_), None) => return Err("--target requires --unit".into()),
                (None, Some(_)) => return Err("--unit requires --target".into()),
                (None, None) => Goal::YesNo,
            };
            let habit = tracker.create_habit(CreateHabitParams {
                name,
                description,
                color,
                frequency,
                goal,
                start_date: start,
                end_date: end,
            })?;
            println!("created habit {:?} ({})", habit.name, habit.id);
        }

        Command::List { all } => {
            let habits = tracker.list_habits(all)?;
            if habits.is_empty() {
                println!("no habits yet; try `habits add <name>`");
            }
            for habit in habits {
                let marker = if habit.is_active { " " } else { "a" };
                println!(
                    "{} {}  {} ({}, goal: {})",
                    marker,
                    habit.id,
                    habit.name,
                    schedule_summary(&habit),
                    habit.goal.display(),
                );
            }
        }

        Command::Check { habit, date, value } => {
            let habit = resolve_habit(&tracker, &habit)?;
            let outcome = tracker.check_in(habit.id, date, value)?;
            let status = &outcome.status;
            match &habit.goal {
                Goal::Target { target, unit } => println!(
                    "{} {} - {}/{} {} logged, streak: {}",
                    checkbox(status.completed),
                    habit.name,
                    status.progress,
                    target,
                    unit,
                    outcome.streak.current,
                ),
                _ => println!(
                    "{} {} - done, streak: {}",
                    checkbox(status.completed),
                    habit.name,
                    outcome.streak.current,
                ),
            }
        }

        Command::Uncheck { habit, date } => {
            let habit = resolve_habit(&tracker, &habit)?;
            if tracker.uncheck(habit.id, date)? {
                println!("unchecked {}", habit.name);
            } else {
                println!("nothing logged for {} on that day", habit.name);
            }
        }

        Command::Stats { habit } => {
            let habit = resolve_habit(&tracker, &habit)?;
            let stats = tracker.habit_stats(habit.id)?;
            println!("{}", stats.habit.name);
            println!(
                "  current streak: {} day(s), longest: {}, total completions: {}",
                stats.current_streak, stats.longest_streak, stats.total_completions
            );
            let active_days = stats.heatmap.iter().filter(|d| d.count > 0).count();
            println!("  active days in the last year: {}", active_days);
            for bucket in &stats.chart {
                println!("  {:<9} {}", bucket.label, "#".repeat(bucket.total.min(60) as usize));
            }
        }

        Command::Day { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let view = tracker.day_view(date)?;
            let when = if view.is_today {
                "today"
            } else if view.is_past {
                "past"
            } else {
                "future"
            };
            println!(
                "{} ({}): {}/{} done ({}%)",
                view.date, when, view.completed_count, view.habits_count, view.completion_rate
            );
            for status in &view.habits {
                match &status.habit.goal {
                    Goal::Target { target, unit } => println!(
                        "  {} {} ({}/{} {})",
                        checkbox(status.completed),
                        status.habit.name,
                        status.progress,
                        target,
                        unit
                    ),
                    _ => println!("  {} {}", checkbox(status.completed), status.habit.name),
                }
            }
        }

        Command::Month { month } => {
            let (year, month) = match month {
                Some(spec) => parse_month(&spec)?,
                None => {
                    let today = Utc::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let cells = tracker.month_view(year, month)?;
            for cell in cells {
                if cell.total_count == 0 {
                    println!("  {}  -", cell.date);
                } else {
                    println!(
                        "  {}  {:>3}%  {}/{}  {}",
                        cell.date,
                        cell.completion_rate,
                        cell.completed_count,
                        cell.total_count,
                        cell.color
                    );
                }
            }
        }

        Command::Dashboard => {
            let dash = tracker.dashboard()?;
            println!(
                "{} habit(s), {} done today ({}%)",
                dash.total_habits, dash.completed_today, dash.completion_rate
            );
            for entry in &dash.habits {
                if entry.due_today {
                    println!(
                        "  {} {} (today: {})",
                        checkbox(entry.completed_today),
                        entry.habit.name,
                        entry.today_value
                    );
                } else {
                    println!("   -  {} (not due today)", entry.habit.name);
                }
            }
        }

        Command::Archive { habit } => {
            let habit = resolve_habit(&tracker, &habit)?;
            tracker.archive_habit(habit.id)?;
            println!("archived {}", habit.name);
        }

        Command::Restore { habit } => {
            let habit = resolve_habit(&tracker, &habit)?;
            tracker.restore_habit(habit.id)?;
            println!("restored {}", habit.name);
        }

        Command::Remove { habit } => {
            let habit = resolve_habit(&tracker, &habit)?;
            tracker.soft_delete_habit(habit.id)?;
            println!(
                "removed {} (kept for {} days before permanent deletion)",
                habit.name,
                habit_tracker::storage::RETENTION_DAYS
            );
        }

        Command::Purge => {
            let purged = tracker.purge_deleted()?;
            println!("purged {} habit(s)", purged);
        }
    }

    Ok(())
}

fn schedule_summary(habit: &Habit) -> String {
    const DAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
    match &habit.frequency {
        Frequency::Daily => "daily".to_string(),
        Frequency::SpecificDays { days } => days
            .iter()
            .map(|d| DAY_NAMES.get(*d as usize).copied().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(","),
        Frequency::Unsupported => "unsupported".to_string(),
    }
}
