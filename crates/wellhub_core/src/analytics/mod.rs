//! Pure derived-data algorithms shared by every tracker.
//!
//! # Responsibility
//! - Date-window bucketing and reduction (`window`).
//! - Consecutive-day streaks (`streak`).
//! - Goal tiers and progress (`goal`).
//!
//! # Invariants
//! - Functions here never touch storage and are deterministic for equal input.

pub mod goal;
pub mod streak;
pub mod window;

pub use goal::{evaluate, progress_percent, remaining, GoalThresholds, GoalTier};
pub use streak::{compute_streak, streak_from_days, toggle_completion};
pub use window::{
    aggregate, average_over_recorded_days, build_window, daily_series, pearson, DailyPoint,
    DayBucket, Reducer, WindowError,
};

/// Rounds a ratio to a whole percentage (`completed / total * 100`).
///
/// Returns 0 when `total` is zero.
pub fn round_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

/// Descriptive average text: one decimal place, `"0"` when there is no data.
pub fn format_one_decimal(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}"),
        None => "0".to_string(),
    }
}
