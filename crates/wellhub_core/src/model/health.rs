//! Daily health tracker payloads.
//!
//! Amounts are plain floats in the unit named by the field (`amount_ml`,
//! `amount_mg`); scales (`energy_level`, `pain_level`, `severity`) are the
//! small integer ranges shown by the tracker pages.

use crate::calendar::ClockTime;
use crate::model::record::{CollectionRecord, Dated};
use crate::registry::collections::{
    BODY_WEATHER, DAILY_CHECK_INS, HYDRATION, PAIN_MAP, SLEEP, SODIUM, SYMPTOMS,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeverageKind {
    Water,
    Electrolyte,
    Other,
}

/// One drink logged by the hydration dial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(rename = "amount")]
    pub amount_ml: f64,
    #[serde(rename = "type")]
    pub kind: BeverageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One sodium intake entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SodiumEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(rename = "amount")]
    pub amount_mg: f64,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Weather {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Stormy,
    Tornado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    Great,
    Good,
    Okay,
    Struggling,
    Crisis,
}

/// "Body weather" snapshot: a weather metaphor plus energy/pain scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyWeatherEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    pub weather: Weather,
    /// 1..=5
    pub energy_level: u8,
    /// 1..=10
    pub pain_level: u8,
    pub mood: MoodLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainKind {
    Sharp,
    Dull,
    Burning,
    Aching,
    Throbbing,
    Stabbing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainPoint {
    /// Body location key such as `neck` or `back-upper`.
    pub location: String,
    /// 1..=10
    pub intensity: u8,
    #[serde(rename = "type")]
    pub kind: PainKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PainMapEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    pub pain_points: Vec<PainPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKind {
    Physical,
    Mental,
    Emotional,
    Cognitive,
}

impl SymptomKind {
    /// Wire value, as stored in the `by-type` index.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Mental => "mental",
            Self::Emotional => "emotional",
            Self::Cognitive => "cognitive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    pub symptom: String,
    /// 1..=5
    pub severity: u8,
    #[serde(rename = "type")]
    pub kind: SymptomKind,
    /// Free-text links to other collections (never ids).
    #[serde(default, alias = "tags")]
    pub related_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One night of sleep, dated by the wake-up day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub date: NaiveDate,
    pub bed_time: ClockTime,
    pub wake_time: ClockTime,
    #[serde(rename = "duration")]
    pub duration_hours: f64,
    /// 1..=5
    pub quality: u8,
    pub nightmares: bool,
    pub wake_ups: u32,
    pub restful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCheckIn {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    /// 1..=10
    pub pain: u8,
    /// 1..=5
    pub energy: u8,
    /// 1..=5
    pub mood: u8,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gratitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

macro_rules! dated_collection {
    ($($ty:ty => $collection:expr),+ $(,)?) => {
        $(
            impl CollectionRecord for $ty {
                const COLLECTION: &'static str = $collection;
            }

            impl Dated for $ty {
                fn day(&self) -> NaiveDate {
                    self.date
                }
            }
        )+
    };
}

dated_collection! {
    HydrationEntry => HYDRATION,
    SodiumEntry => SODIUM,
    BodyWeatherEntry => BODY_WEATHER,
    PainMapEntry => PAIN_MAP,
    SymptomEntry => SYMPTOMS,
    SleepEntry => SLEEP,
    DailyCheckIn => DAILY_CHECK_INS,
}
