//! Daily goals edited from the hydration and sodium pages.
//!
//! The `goalSettings` collection holds at most one record; without it the
//! configured `[goals]` apply.

use crate::config::GoalsConfig;
use crate::model::record::CollectionRecord;
use crate::registry::collections::GOAL_SETTINGS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_INTERVAL_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationGoal {
    pub daily_goal_liters: f64,
    #[serde(default = "enabled")]
    pub reminder_enabled: bool,
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SodiumGoal {
    pub daily_goal_mg: f64,
    #[serde(default = "enabled")]
    pub tracking_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalSettings {
    pub hydration: HydrationGoal,
    pub sodium: SodiumGoal,
}

fn enabled() -> bool {
    true
}

fn default_reminder_interval() -> u32 {
    DEFAULT_REMINDER_INTERVAL_MINUTES
}

impl From<&GoalsConfig> for GoalSettings {
    fn from(config: &GoalsConfig) -> Self {
        Self {
            hydration: HydrationGoal {
                daily_goal_liters: config.hydration_daily_liters,
                reminder_enabled: true,
                reminder_interval_minutes: DEFAULT_REMINDER_INTERVAL_MINUTES,
            },
            sodium: SodiumGoal {
                daily_goal_mg: config.sodium_daily_mg,
                tracking_enabled: true,
            },
        }
    }
}

impl CollectionRecord for GoalSettings {
    const COLLECTION: &'static str = GOAL_SETTINGS;
}

#[cfg(test)]
mod tests {
    use super::{GoalSettings, DEFAULT_REMINDER_INTERVAL_MINUTES};
    use crate::config::GoalsConfig;
    use serde_json::json;

    #[test]
    fn config_defaults_seed_settings() {
        let settings = GoalSettings::from(&GoalsConfig::default());
        assert_eq!(settings.hydration.daily_goal_liters, 2.5);
        assert_eq!(settings.sodium.daily_goal_mg, 4000.0);
        assert!(settings.hydration.reminder_enabled);
        assert!(settings.sodium.tracking_enabled);
    }

    #[test]
    fn missing_toggles_default_on() {
        let settings: GoalSettings = serde_json::from_value(json!({
            "hydration": { "dailyGoalLiters": 3.0 },
            "sodium": { "dailyGoalMg": 5000 },
        }))
        .unwrap();
        assert_eq!(
            settings.hydration.reminder_interval_minutes,
            DEFAULT_REMINDER_INTERVAL_MINUTES
        );
        assert!(settings.sodium.tracking_enabled);
        assert_eq!(settings.sodium.daily_goal_mg, 5000.0);
    }
}
