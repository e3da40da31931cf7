/// Engine-level unit tests through the public API: due-date evaluation,
/// reconciliation, streaks and summaries over hand-built in-memory data.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use habit_tracker::analytics::{
    build_day_view, build_month_view, compute_streaks, heatmap, monthly_series, reconcile,
    StreakSummary, RATE_COLORS,
};
use habit_tracker::{Completion, Frequency, Goal, Habit, UserId};

fn owner() -> UserId {
    UserId(Uuid::nil())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habit(name: &str, frequency: Frequency, goal: Goal) -> Habit {
    Habit::new(
        owner(),
        name.to_string(),
        None,
        None,
        frequency,
        goal,
        None,
        None,
    )
    .unwrap()
}

#[test]
fn daily_habit_is_due_every_day() {
    let h = habit("Run", Frequency::Daily, Goal::YesNo);
    let mut day = date(2024, 1, 1);
    for _ in 0..60 {
        assert!(h.is_due_on(day));
        day += Duration::days(1);
    }
}

#[test]
fn specific_days_follow_monday_first_convention() {
    // Mon/Wed/Fri habit; 2024-06-04 is a Tuesday, 2024-06-03 a Monday.
    let h = habit(
        "Gym",
        Frequency::specific_days([0, 2, 4]),
        Goal::YesNo,
    );
    assert!(!h.is_due_on(date(2024, 6, 4)));
    assert!(h.is_due_on(date(2024, 6, 3)));
}

#[test]
fn due_evaluation_has_no_today_dependency() {
    // The same evaluation works for far past and far future dates.
    let mut h = habit("Run", Frequency::Daily, Goal::YesNo);
    h.start_date = Some(date(2020, 1, 1));
    h.end_date = Some(date(2030, 1, 1));

    assert!(!h.is_due_on(date(2019, 12, 31)));
    assert!(h.is_due_on(date(2020, 1, 1)));
    assert!(h.is_due_on(date(2029, 12, 31)));
    assert!(!h.is_due_on(date(2030, 1, 2)));
}

#[test]
fn target_goal_reconciliation_tracks_progress() {
    // Scenario: 8-glasses water goal, 5 logged so far.
    let h = habit(
        "Water",
        Frequency::Daily,
        Goal::Target {
            target: 8,
            unit: "glasses".to_string(),
        },
    );
    let day = date(2024, 6, 5);
    let partial = Completion::new(h.id, day, 5).unwrap();

    let statuses = reconcile(std::slice::from_ref(&h), &[partial], day);
    assert!(!statuses[0].completed);
    assert_eq!(statuses[0].progress, 5);

    // After the same-day top-up the single record reads 8.
    let full = Completion::new(h.id, day, 8).unwrap();
    let statuses = reconcile(std::slice::from_ref(&h), &[full], day);
    assert!(statuses[0].completed);
    assert_eq!(statuses[0].progress, 8);
}

#[test]
fn streak_scenarios_from_consecutive_and_gapped_histories() {
    let today = date(2024, 6, 5);
    let id = habit("Run", Frequency::Daily, Goal::YesNo).id;
    let on = |offsets: &[i64]| -> Vec<Completion> {
        offsets
            .iter()
            .map(|off| Completion::new(id, today - Duration::days(*off), 1).unwrap())
            .collect()
    };

    // T, T-1, T-2 consecutive.
    assert_eq!(
        compute_streaks(&on(&[0, 1, 2]), today),
        StreakSummary {
            current: 3,
            longest: 3
        }
    );

    // T, T-1, T-3: the gap at T-2 caps the run at 2.
    assert_eq!(
        compute_streaks(&on(&[0, 1, 3]), today),
        StreakSummary {
            current: 2,
            longest: 2
        }
    );
}

#[test]
fn heatmap_total_matches_window_values() {
    let today = date(2024, 6, 5);
    let id = habit("Run", Frequency::Daily, Goal::YesNo).id;
    let completions: Vec<Completion> = (0..400)
        .step_by(7)
        .map(|off| Completion::new(id, today - Duration::days(off), 2).unwrap())
        .collect();

    let series = heatmap(&completions, 365, today);
    let series_total: u32 = series.iter().map(|d| d.count).sum();
    let window_total: u32 = completions
        .iter()
        .filter(|c| (today - c.date).num_days() < 365)
        .map(|c| c.value)
        .sum();
    assert_eq!(series_total, window_total);
}

#[test]
fn monthly_series_is_chronological() {
    let id = habit("Run", Frequency::Daily, Goal::YesNo).id;
    let completions = vec![
        Completion::new(id, date(2024, 3, 5), 1).unwrap(),
        Completion::new(id, date(2023, 11, 5), 1).unwrap(),
        Completion::new(id, date(2024, 1, 5), 1).unwrap(),
    ];

    let labels: Vec<String> = monthly_series(&completions)
        .into_iter()
        .map(|b| b.label)
        .collect();
    assert_eq!(labels, ["Nov 2023", "Jan 2024", "Mar 2024"]);
}

#[test]
fn day_view_rate_counts_only_due_habits() {
    let today = date(2024, 6, 5); // Wednesday
    let daily = habit("Run", Frequency::Daily, Goal::YesNo);
    let weekend = habit("Hike", Frequency::specific_days([5, 6]), Goal::YesNo);
    let done = Completion::new(daily.id, today, 1).unwrap();

    let view = build_day_view(&[daily, weekend], &[done], today, today);
    assert_eq!(view.habits_count, 1);
    assert_eq!(view.completed_count, 1);
    assert_eq!(view.completion_rate, 100);
}

#[test]
fn month_view_buckets_rates_into_five_colors() {
    // Four daily habits; completing 0/1/2/3/4 of them across days exercises
    // every bucket boundary.
    let habits: Vec<Habit> = (0..4)
        .map(|i| habit(&format!("h{}", i), Frequency::Daily, Goal::YesNo))
        .collect();

    let mut completions = Vec::new();
    for (count, day) in [(0u32, 1u32), (1, 2), (2, 3), (3, 4), (4, 5)] {
        for habit in habits.iter().take(count as usize) {
            completions.push(Completion::new(habit.id, date(2024, 6, day), 1).unwrap());
        }
    }

    let cells = build_month_view(&habits, &completions, 2024, 6).unwrap();
    assert_eq!(cells[0].color, RATE_COLORS[0]); // 0%
    assert_eq!(cells[1].color, RATE_COLORS[2]); // 25%
    assert_eq!(cells[2].color, RATE_COLORS[3]); // 50%
    assert_eq!(cells[3].color, RATE_COLORS[4]); // 75%
    assert_eq!(cells[4].color, RATE_COLORS[4]); // 100%
}
