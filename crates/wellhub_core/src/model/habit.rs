//! Habit payload with completion history and streak counters.

use crate::model::record::CollectionRecord;
use crate::registry::collections::HABITS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Health,
    Productivity,
    Mindfulness,
    Social,
    Learning,
    Creative,
    Other,
}

impl HabitCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Productivity => "productivity",
            Self::Mindfulness => "mindfulness",
            Self::Social => "social",
            Self::Learning => "learning",
            Self::Creative => "creative",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Daily,
    Weekly,
    Monthly,
}

/// Tracked habit.
///
/// `completed_dates` is kept sorted ascending by the streak engine but is
/// not deduplicated; see `analytics::streak`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub name: String,
    pub category: HabitCategory,
    pub frequency: HabitFrequency,
    pub target_days: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub completed_dates: Vec<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_active() -> bool {
    true
}

impl Habit {
    /// New daily habit with an empty history.
    pub fn new(name: impl Into<String>, category: HabitCategory) -> Self {
        Self {
            name: name.into(),
            category,
            frequency: HabitFrequency::Daily,
            target_days: 30,
            current_streak: 0,
            longest_streak: 0,
            completed_dates: Vec::new(),
            active: true,
            notes: String::new(),
        }
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }
}

impl CollectionRecord for Habit {
    const COLLECTION: &'static str = HABITS;
}
