//! Dated-tracker queries: windows, daily totals, goals and history.
//!
//! # Responsibility
//! - Feed store records into the window aggregator and goal evaluator.
//! - Provide the newest-first history views used by tracker pages.
//!
//! # Invariants
//! - Chart series are zero-filled; recorded-day averages skip empty days.
//! - Hydration is stored in mL and evaluated against a goal in liters.

use crate::analytics::{
    average_over_recorded_days, build_window, daily_series, progress_percent, remaining,
    DailyPoint, DayBucket, GoalTier, Reducer,
};
use crate::calendar::format_day;
use crate::config::GoalsConfig;
use crate::model::goals::{GoalSettings, HydrationGoal, SodiumGoal};
use crate::model::health::SleepEntry;
use crate::model::record::{CollectionRecord, Dated, Record};
use crate::registry::collections::{BY_DATE, HYDRATION, SODIUM};
use crate::registry::lookup_path;
use crate::service::{ServiceError, ServiceResult};
use crate::store::StoreHandle;
use chrono::{Days, NaiveDate};
use serde_json::Value;

const AMOUNT_FIELD: &str = "amount";
const ML_PER_LITER: f64 = 1000.0;

/// Daily total measured against its goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalStatus {
    pub total: f64,
    pub goal: f64,
    pub tier: GoalTier,
    /// Rounded, clamped to `0..=100`.
    pub percent: u8,
    pub remaining: f64,
}

pub struct TrackerService<'h> {
    handle: &'h StoreHandle,
    goals: GoalsConfig,
}

impl<'h> TrackerService<'h> {
    pub fn new(handle: &'h StoreHandle) -> Self {
        Self {
            handle,
            goals: GoalsConfig::default(),
        }
    }

    pub fn with_goals(mut self, goals: GoalsConfig) -> Self {
        self.goals = goals;
        self
    }

    pub fn goals(&self) -> &GoalsConfig {
        &self.goals
    }

    /// Stored goal settings, or the configured defaults when none were saved.
    pub fn goal_settings(&self) -> ServiceResult<GoalSettings> {
        Ok(self
            .stored_goal_settings()?
            .map_or_else(|| GoalSettings::from(&self.goals), |record| record.fields))
    }

    pub fn set_hydration_goal(&self, goal: HydrationGoal) -> ServiceResult<GoalSettings> {
        check_positive("dailyGoalLiters", goal.daily_goal_liters)?;
        if goal.reminder_interval_minutes == 0 {
            return Err(ServiceError::InvalidInput(
                "reminderIntervalMinutes must be positive".to_string(),
            ));
        }
        let mut settings = self.goal_settings()?;
        settings.hydration = goal;
        self.save_goal_settings(settings)
    }

    pub fn set_sodium_goal(&self, goal: SodiumGoal) -> ServiceResult<GoalSettings> {
        check_positive("dailyGoalMg", goal.daily_goal_mg)?;
        let mut settings = self.goal_settings()?;
        settings.sodium = goal;
        self.save_goal_settings(settings)
    }

    fn stored_goal_settings(&self) -> ServiceResult<Option<Record<GoalSettings>>> {
        let mut stored = self.handle.repository::<GoalSettings>().get_all()?;
        Ok(if stored.is_empty() {
            None
        } else {
            Some(stored.swap_remove(0))
        })
    }

    fn save_goal_settings(&self, settings: GoalSettings) -> ServiceResult<GoalSettings> {
        let goals = self.handle.repository::<GoalSettings>();
        let saved = match self.stored_goal_settings()? {
            Some(record) => goals.update(&record.id, &settings)?,
            None => goals.add(&settings)?,
        };
        Ok(saved.fields)
    }

    /// One bucket per day in `start..=end`, records in insertion order.
    pub fn window<T: CollectionRecord + Dated>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<DayBucket<Record<T>>>> {
        let records = self.handle.repository::<T>().get_all()?;
        let entries = records.into_iter().map(|record| (record.day(), record));
        Ok(build_window(entries, start, end)?)
    }

    /// Zero-filled chart series over `start..=end`.
    pub fn daily_series<T: CollectionRecord + Dated>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        reducer: Reducer,
        value_of: impl Fn(&T) -> Option<f64>,
    ) -> ServiceResult<Vec<DailyPoint>> {
        let buckets = self.window::<T>(start, end)?;
        Ok(daily_series(&buckets, reducer, |record| {
            value_of(&record.fields)
        }))
    }

    /// Per-day reduction averaged over days that have records.
    pub fn average_per_recorded_day<T: CollectionRecord + Dated>(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        reducer: Reducer,
        value_of: impl Fn(&T) -> Option<f64>,
    ) -> ServiceResult<Option<f64>> {
        let buckets = self.window::<T>(start, end)?;
        Ok(average_over_recorded_days(&buckets, reducer, |record| {
            value_of(&record.fields)
        }))
    }

    /// Sum of a numeric `field` over one day's records of `collection`.
    ///
    /// Non-numeric or missing values count as zero.
    pub fn daily_total(&self, collection: &str, field: &str, day: NaiveDate) -> ServiceResult<f64> {
        let records =
            self.handle
                .get_all_by_index(collection, BY_DATE, &Value::String(format_day(day)))?;
        Ok(records
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|body| lookup_path(body, field))
            .filter_map(Value::as_f64)
            .fold(0.0, |total, value| total + value))
    }

    /// `daily_total` paired with its goal tier and progress.
    pub fn daily_goal_status(
        &self,
        collection: &str,
        field: &str,
        day: NaiveDate,
        goal: f64,
    ) -> ServiceResult<GoalStatus> {
        let total = self.daily_total(collection, field, day)?;
        Ok(self.goal_status(total, goal))
    }

    /// Sodium mg for `day` against the sodium goal.
    pub fn sodium_status(&self, day: NaiveDate) -> ServiceResult<GoalStatus> {
        let goal = self.goal_settings()?.sodium.daily_goal_mg;
        self.daily_goal_status(SODIUM, AMOUNT_FIELD, day, goal)
    }

    /// Hydration liters for `day` against the hydration goal.
    pub fn hydration_status(&self, day: NaiveDate) -> ServiceResult<GoalStatus> {
        let goal = self.goal_settings()?.hydration.daily_goal_liters;
        let total_ml = self.daily_total(HYDRATION, AMOUNT_FIELD, day)?;
        Ok(self.goal_status(total_ml / ML_PER_LITER, goal))
    }

    /// Records dated within the last `days` days (inclusive of the cutoff),
    /// newest first. Same-day records keep newest-inserted first.
    pub fn recent_history<T: CollectionRecord + Dated>(
        &self,
        today: NaiveDate,
        days: u64,
    ) -> ServiceResult<Vec<Record<T>>> {
        let cutoff = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        let mut records: Vec<Record<T>> = self
            .handle
            .repository::<T>()
            .get_all()?
            .into_iter()
            .filter(|record| record.day() >= cutoff)
            .collect();
        newest_first(&mut records);
        Ok(records)
    }

    /// Most recently inserted record dated `day`, if any.
    pub fn latest_for_day<T: CollectionRecord + Dated>(
        &self,
        day: NaiveDate,
    ) -> ServiceResult<Option<Record<T>>> {
        let mut records = self
            .handle
            .repository::<T>()
            .get_all_by_index(BY_DATE, format_day(day))?;
        Ok(records.pop())
    }

    /// Earliest inserted record dated `day`, if any.
    pub fn first_for_day<T: CollectionRecord + Dated>(
        &self,
        day: NaiveDate,
    ) -> ServiceResult<Option<Record<T>>> {
        let records = self
            .handle
            .repository::<T>()
            .get_all_by_index(BY_DATE, format_day(day))?;
        Ok(records.into_iter().next())
    }

    /// The night logged for `day`; a repeat entry never replaces the first.
    pub fn sleep_for_day(&self, day: NaiveDate) -> ServiceResult<Option<Record<SleepEntry>>> {
        self.first_for_day::<SleepEntry>(day)
    }

    fn goal_status(&self, total: f64, goal: f64) -> GoalStatus {
        GoalStatus {
            total,
            goal,
            tier: self.goals.thresholds.evaluate(total, goal),
            percent: progress_percent(total, goal),
            remaining: remaining(total, goal),
        }
    }
}

fn check_positive(field: &str, value: f64) -> ServiceResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!("{field} must be positive")))
    }
}

/// Sorts by day descending; ties go to the later-inserted record.
pub(crate) fn newest_first<T: Dated>(records: &mut [T]) {
    records.reverse();
    records.sort_by(|a, b| b.day().cmp(&a.day()));
}
