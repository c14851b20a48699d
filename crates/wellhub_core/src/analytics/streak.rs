//! Consecutive-day streaks over completion dates.
//!
//! # Invariants
//! - A difference other than exactly one day between adjacent dates ends the
//!   streak. This includes a repeated date (difference zero).
//! - `longest_streak` is a high-water mark and never decreases.

use crate::model::habit::Habit;
use chrono::NaiveDate;

/// Streak length from the newest date backwards.
///
/// `dates` must be sorted newest first. Empty input yields 0.
pub fn compute_streak(dates_descending: &[NaiveDate]) -> u32 {
    if dates_descending.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in dates_descending.windows(2) {
        if (pair[0] - pair[1]).num_days() != 1 {
            break;
        }
        streak += 1;
    }
    streak
}

/// Streak over dates in any order; sorts newest first without deduplicating.
pub fn streak_from_days(days: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let mut sorted: Vec<NaiveDate> = days.into_iter().collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    compute_streak(&sorted)
}

/// Flips completion of `day` and recomputes both streak counters.
///
/// Removing drops every copy of `day`; adding appends it and keeps the list
/// ascending.
pub fn toggle_completion(habit: &Habit, day: NaiveDate) -> Habit {
    let mut next = habit.clone();
    if next.completed_dates.contains(&day) {
        next.completed_dates.retain(|completed| *completed != day);
    } else {
        next.completed_dates.push(day);
        next.completed_dates.sort();
    }

    next.current_streak = streak_from_days(next.completed_dates.iter().copied());
    next.longest_streak = next.longest_streak.max(next.current_streak);
    next
}
