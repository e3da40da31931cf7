/// End-to-end flows over a temporary SQLite database: create habits, check
/// in (including same-day accumulation), derive stats and views, then walk
/// the archive / soft-delete / purge lifecycle.
///
/// The service functions take the reference day explicitly, so these tests
/// run on fixed calendar dates with no wall-clock dependence.

use chrono::{Duration, NaiveDate, Utc};
use tempfile::NamedTempFile;
use uuid::Uuid;

use habit_tracker::service::{self, CreateHabitParams, UpdateHabitParams};
use habit_tracker::storage::{CompletionStore, HabitStore, RETENTION_DAYS};
use habit_tracker::{Frequency, Goal, Habit, SqliteStorage, UserId};

fn owner() -> UserId {
    UserId(Uuid::nil())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_storage() -> (SqliteStorage, NamedTempFile) {
    let file = NamedTempFile::new().expect("failed to create temp file");
    let storage = SqliteStorage::new(file.path().to_path_buf()).expect("failed to open storage");
    (storage, file)
}

fn create(storage: &SqliteStorage, name: &str, frequency: Frequency, goal: Goal) -> Habit {
    service::create_habit(
        storage,
        owner(),
        CreateHabitParams {
            name: name.to_string(),
            description: None,
            color: None,
            frequency,
            goal,
            start_date: None,
            end_date: None,
        },
    )
    .unwrap()
}

#[test]
fn full_checkin_and_stats_flow() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);

    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);

    // Three consecutive days ending today.
    for offset in (0..3).rev() {
        let day = today - Duration::days(offset);
        service::check_in(&storage, owner(), run.id, Some(day), None, today).unwrap();
    }

    let stats = service::habit_stats(&storage, owner(), run.id, today).unwrap();
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.total_completions, 3);
    assert_eq!(stats.heatmap.len(), 365);
    assert_eq!(stats.heatmap.last().unwrap().count, 1);
    assert_eq!(stats.chart.len(), 1);
    assert_eq!(stats.chart[0].label, "Jun 2024");
    assert_eq!(stats.chart[0].total, 3);
}

#[test]
fn same_day_checkins_accumulate_without_duplicates() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);

    let water = create(
        &storage,
        "Water",
        Frequency::Daily,
        Goal::Target {
            target: 8,
            unit: "glasses".to_string(),
        },
    );

    let first = service::check_in(&storage, owner(), water.id, None, Some(5), today).unwrap();
    assert!(!first.status.completed);
    assert_eq!(first.status.progress, 5);

    let second = service::check_in(&storage, owner(), water.id, None, Some(3), today).unwrap();
    assert!(second.status.completed);
    assert_eq!(second.status.progress, 8);
    assert_eq!(second.completion.id, first.completion.id);

    // Never 13 from a duplicated row: exactly one record for the day.
    let history = storage.completions_for_habit(&water.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].value, 8);
}

#[test]
fn future_checkins_are_rejected() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);
    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);

    let result = service::check_in(
        &storage,
        owner(),
        run.id,
        Some(today + Duration::days(1)),
        None,
        today,
    );
    assert!(result.is_err());
}

#[test]
fn uncheck_removes_the_days_record() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);
    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);

    service::check_in(&storage, owner(), run.id, None, None, today).unwrap();
    assert!(service::uncheck(&storage, owner(), run.id, today).unwrap());
    assert!(!service::uncheck(&storage, owner(), run.id, today).unwrap());

    let view = service::day_view(&storage, owner(), today, today).unwrap();
    assert_eq!(view.completed_count, 0);
}

#[test]
fn day_and_month_views_reflect_schedules() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5); // Wednesday

    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);
    create(
        &storage,
        "Hike",
        Frequency::specific_days([5, 6]), // weekends
        Goal::YesNo,
    );

    service::check_in(&storage, owner(), run.id, None, None, today).unwrap();

    let view = service::day_view(&storage, owner(), today, today).unwrap();
    assert!(view.is_today);
    assert_eq!(view.habits_count, 1); // the hike is not due midweek
    assert_eq!(view.completed_count, 1);
    assert_eq!(view.completion_rate, 100);

    let cells = service::month_view(&storage, owner(), 2024, 6).unwrap();
    assert_eq!(cells.len(), 30);
    let wednesday = cells.iter().find(|c| c.date == today).unwrap();
    assert_eq!(wednesday.completion_rate, 100);
    // Weekend days count both habits.
    let saturday = cells.iter().find(|c| c.date == date(2024, 6, 8)).unwrap();
    assert_eq!(saturday.total_count, 2);
}

#[test]
fn editing_a_habit_changes_its_schedule() {
    let (storage, _file) = open_storage();
    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);

    service::update_habit(
        &storage,
        owner(),
        run.id,
        UpdateHabitParams {
            frequency: Some(Frequency::specific_days([0])), // Mondays only
            ..Default::default()
        },
    )
    .unwrap();

    let loaded = storage.get_habit(&owner(), &run.id).unwrap();
    assert!(loaded.is_due_on(date(2024, 6, 3))); // Monday
    assert!(!loaded.is_due_on(date(2024, 6, 5))); // Wednesday
}

#[test]
fn archive_and_restore_lifecycle() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);
    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);
    service::check_in(&storage, owner(), run.id, None, None, today).unwrap();

    service::archive_habit(&storage, owner(), run.id).unwrap();

    // Excluded from the active set and from every view denominator.
    assert!(storage.list_habits(&owner(), false).unwrap().is_empty());
    let view = service::day_view(&storage, owner(), today, today).unwrap();
    assert_eq!(view.habits_count, 0);

    // History survived archival.
    assert_eq!(storage.completions_for_habit(&run.id).unwrap().len(), 1);

    service::restore_habit(&storage, owner(), run.id).unwrap();
    let view = service::day_view(&storage, owner(), today, today).unwrap();
    assert_eq!(view.habits_count, 1);
    assert_eq!(view.completed_count, 1);
}

#[test]
fn soft_delete_hides_then_purge_removes_after_retention() {
    let (storage, _file) = open_storage();
    let now = Utc::now();
    let today = now.date_naive();
    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);
    service::check_in(&storage, owner(), run.id, None, None, today).unwrap();

    service::soft_delete_habit(&storage, owner(), run.id, now).unwrap();
    assert!(storage.get_habit(&owner(), &run.id).is_err());

    // Within the retention window nothing is purged.
    assert_eq!(service::purge_deleted(&storage, now).unwrap(), 0);

    // Once the window has elapsed the sweep removes habit and history.
    let later = now + Duration::days(RETENTION_DAYS + 1);
    assert_eq!(service::purge_deleted(&storage, later).unwrap(), 1);
    assert!(storage.completions_for_habit(&run.id).unwrap().is_empty());
}

#[test]
fn dashboard_summarizes_today() {
    let (storage, _file) = open_storage();
    let today = date(2024, 6, 5);

    let run = create(&storage, "Run", Frequency::Daily, Goal::YesNo);
    create(&storage, "Read", Frequency::Daily, Goal::YesNo);

    service::check_in(&storage, owner(), run.id, None, None, today).unwrap();

    let dash = service::dashboard(&storage, owner(), today).unwrap();
    assert_eq!(dash.total_habits, 2);
    assert_eq!(dash.completed_today, 1);
    assert_eq!(dash.completion_rate, 50);

    let run_entry = dash.habits.iter().find(|h| h.habit.id == run.id).unwrap();
    assert!(run_entry.completed_today);
    assert_eq!(run_entry.today_value, 1);
}
