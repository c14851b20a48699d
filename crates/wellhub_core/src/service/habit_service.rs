//! Habit use-cases: completion toggles and summary statistics.

use crate::analytics::{format_one_decimal, toggle_completion};
use crate::model::habit::{Habit, HabitCategory};
use crate::model::record::{Record, RecordId};
use crate::registry::collections::BY_CATEGORY;
use crate::service::ServiceResult;
use crate::store::{Repository, StoreHandle};
use chrono::NaiveDate;
use log::info;

/// Aggregate numbers for the habits overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSummary {
    pub total: usize,
    pub active: usize,
    /// Mean current streak, one decimal (`"0"` without habits).
    pub average_streak: String,
    pub best_streak: u32,
    pub total_completions: usize,
}

pub struct HabitService<'h> {
    habits: Repository<'h, Habit>,
}

impl<'h> HabitService<'h> {
    pub fn new(handle: &'h StoreHandle) -> Self {
        Self {
            habits: handle.repository(),
        }
    }

    pub fn create(&self, habit: &Habit) -> ServiceResult<Record<Habit>> {
        Ok(self.habits.add(habit)?)
    }

    /// Flips completion of `day` and persists the recomputed streaks.
    pub fn toggle(&self, id: &RecordId, day: NaiveDate) -> ServiceResult<Record<Habit>> {
        let current = self.habits.get(id)?;
        let next = toggle_completion(&current.fields, day);
        let completed = next.is_completed_on(day);
        let saved = self.habits.update(id, &next)?;
        info!(
            "event=habit_toggle module=habit status=ok id={} completed={} current_streak={}",
            saved.id, completed, saved.fields.current_streak
        );
        Ok(saved)
    }

    pub fn by_category(&self, category: HabitCategory) -> ServiceResult<Vec<Record<Habit>>> {
        Ok(self.habits.get_all_by_index(BY_CATEGORY, category.as_str())?)
    }

    pub fn all(&self) -> ServiceResult<Vec<Record<Habit>>> {
        Ok(self.habits.get_all()?)
    }

    pub fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        Ok(self.habits.delete(id)?)
    }

    pub fn summary(&self) -> ServiceResult<HabitSummary> {
        Ok(summarize(&self.habits.get_all()?))
    }
}

fn summarize(habits: &[Record<Habit>]) -> HabitSummary {
    let average = if habits.is_empty() {
        None
    } else {
        let streaks: u32 = habits.iter().map(|habit| habit.fields.current_streak).sum();
        Some(f64::from(streaks) / habits.len() as f64)
    };

    HabitSummary {
        total: habits.len(),
        active: habits.iter().filter(|habit| habit.fields.active).count(),
        average_streak: format_one_decimal(average),
        best_streak: habits
            .iter()
            .map(|habit| habit.fields.longest_streak)
            .max()
            .unwrap_or(0),
        total_completions: habits
            .iter()
            .map(|habit| habit.fields.completed_dates.len())
            .sum(),
    }
}
