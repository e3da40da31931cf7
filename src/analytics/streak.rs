/// Streak calculation over one habit's completion history
///
/// A streak is a maximal run of consecutive calendar days each having a
/// completion. The reference day is an explicit parameter everywhere so the
/// calculation is deterministic and testable without wall-clock mocking; the
/// service facade is the only place it defaults to the current day.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Completion;

/// Current and longest consecutive-day streaks for one habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Length of the run ending at `today` (or yesterday, see below)
    pub current: u32,
    /// Longest run anywhere in the history, including the current one
    pub longest: u32,
}

impl StreakSummary {
    pub const ZERO: StreakSummary = StreakSummary {
        current: 0,
        longest: 0,
    };
}

/// Compute current and longest streaks from a habit's completion history
///
/// The list does not need to be sorted. Days are deduplicated first; a day
/// with any completion counts once. The current streak counts backward from
/// `today`, and a not-yet-completed `today` does not break it: the most
/// recent completed day qualifies as long as it is today or yesterday. Once a
/// gap of two or more days is found the current run stops; older runs only
/// count toward `longest`.
pub fn compute_streaks(completions: &[Completion], today: NaiveDate) -> StreakSummary {
    let mut days: Vec<NaiveDate> = completions.iter().map(|c| c.date).collect();
    days.sort_unstable();
    days.dedup();

    if days.is_empty() {
        return StreakSummary::ZERO;
    }

    // Longest: one ascending pass over deduplicated days.
    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    // Current: walk backward from the most recent day, provided that day is
    // today or yesterday relative to the reference day.
    let most_recent = days[days.len() - 1];
    let mut current = 0u32;
    if most_recent <= today && (today - most_recent).num_days() <= 1 {
        current = 1;
        for pair in days.windows(2).rev() {
            if (pair[1] - pair[0]).num_days() == 1 {
                current += 1;
            } else {
                break;
            }
        }
    }

    StreakSummary { current, longest }
}
