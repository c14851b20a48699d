//! Flare (adverse episode) payload.
//!
//! # Invariants
//! - `status` starts as `Active` and can only move to `Resolved`.
//! - `end_date`, `end_time` and `duration` are set iff `status == Resolved`.
//! - Several flares may be active at the same time.

use crate::calendar::ClockTime;
use crate::model::record::{CollectionRecord, Dated};
use crate::registry::collections::FLARE_EVENTS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlareStatus {
    Active,
    Resolved,
}

impl FlareStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlareEvent {
    pub start_date: NaiveDate,
    pub start_time: ClockTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    pub status: FlareStatus,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// 1..=5
    pub severity: u8,
    #[serde(default)]
    pub treatments_tried: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Free-text links to symptom/check-in entries (never ids).
    #[serde(default)]
    pub related_tags: Vec<String>,
    /// Human-readable duration, derived at resolution (`"2d 2h"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl FlareEvent {
    pub fn is_active(&self) -> bool {
        self.status == FlareStatus::Active
    }
}

impl CollectionRecord for FlareEvent {
    const COLLECTION: &'static str = FLARE_EVENTS;
}

impl Dated for FlareEvent {
    fn day(&self) -> NaiveDate {
        self.start_date
    }
}
