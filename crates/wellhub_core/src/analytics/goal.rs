//! Goal tiers for bounded daily accumulations (sodium, hydration).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered classification of a total relative to its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTier {
    Critical,
    Low,
    Near,
    Met,
}

impl GoalTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Met => "met",
            Self::Near => "near",
            Self::Low => "low",
            Self::Critical => "critical",
        }
    }
}

impl Display for GoalTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdError {
    OutOfOrder { near: f64, low: f64 },
}

impl Display for ThresholdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfOrder { near, low } => write!(
                f,
                "goal thresholds must satisfy 0 < low < near < 1, got low={low} near={near}"
            ),
        }
    }
}

impl Error for ThresholdError {}

/// Fractional lower bounds of the `near` and `low` tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalThresholds {
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_low")]
    pub low: f64,
}

fn default_near() -> f64 {
    0.75
}

fn default_low() -> f64 {
    0.5
}

impl Default for GoalThresholds {
    fn default() -> Self {
        Self {
            near: default_near(),
            low: default_low(),
        }
    }
}

impl GoalThresholds {
    pub fn new(near: f64, low: f64) -> Result<Self, ThresholdError> {
        let thresholds = Self { near, low };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        if 0.0 < self.low && self.low < self.near && self.near < 1.0 {
            Ok(())
        } else {
            Err(ThresholdError::OutOfOrder {
                near: self.near,
                low: self.low,
            })
        }
    }

    /// Tier of `total` against `goal`. A non-positive goal is always met.
    pub fn evaluate(&self, total: f64, goal: f64) -> GoalTier {
        if goal <= 0.0 {
            return GoalTier::Met;
        }
        let ratio = total / goal;
        if ratio >= 1.0 {
            GoalTier::Met
        } else if ratio >= self.near {
            GoalTier::Near
        } else if ratio >= self.low {
            GoalTier::Low
        } else {
            GoalTier::Critical
        }
    }
}

/// `evaluate` with the default 0.75 / 0.5 thresholds.
pub fn evaluate(total: f64, goal: f64) -> GoalTier {
    GoalThresholds::default().evaluate(total, goal)
}

/// Progress bar percentage, clamped to `0..=100` and rounded.
pub fn progress_percent(total: f64, goal: f64) -> u8 {
    if goal <= 0.0 {
        return 100;
    }
    (total / goal * 100.0).clamp(0.0, 100.0).round() as u8
}

/// Amount still needed to reach `goal`; never negative.
pub fn remaining(total: f64, goal: f64) -> f64 {
    (goal - total).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sodium_tiers() {
        assert_eq!(evaluate(4000.0, 4000.0), GoalTier::Met);
        assert_eq!(evaluate(3000.0, 4000.0), GoalTier::Near);
        assert_eq!(evaluate(2000.0, 4000.0), GoalTier::Low);
        assert_eq!(evaluate(1000.0, 4000.0), GoalTier::Critical);
    }

    #[test]
    fn hydration_tiers_use_same_thresholds() {
        assert_eq!(evaluate(2.5, 2.5), GoalTier::Met);
        assert_eq!(evaluate(1.9, 2.5), GoalTier::Near);
        assert_eq!(evaluate(1.25, 2.5), GoalTier::Low);
        assert_eq!(evaluate(0.0, 2.5), GoalTier::Critical);
    }

    #[test]
    fn exceeding_goal_is_met() {
        assert_eq!(evaluate(5000.0, 4000.0), GoalTier::Met);
        assert_eq!(evaluate(10.0, 0.0), GoalTier::Met);
    }

    #[test]
    fn custom_thresholds() {
        let strict = GoalThresholds::new(0.9, 0.6).unwrap();
        assert_eq!(strict.evaluate(3000.0, 4000.0), GoalTier::Low);
        assert!(GoalThresholds::new(0.5, 0.75).is_err());
        assert!(GoalThresholds::new(1.0, 0.5).is_err());
    }

    #[test]
    fn progress_and_remaining() {
        assert_eq!(progress_percent(1000.0, 4000.0), 25);
        assert_eq!(progress_percent(9000.0, 4000.0), 100);
        assert_eq!(progress_percent(1.0, 3.0), 33);
        assert_eq!(remaining(1000.0, 4000.0), 3000.0);
        assert_eq!(remaining(5000.0, 4000.0), 0.0);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(GoalTier::Critical < GoalTier::Low);
        assert!(GoalTier::Near < GoalTier::Met);
        assert_eq!(GoalTier::Near.as_str(), "near");
    }
}
