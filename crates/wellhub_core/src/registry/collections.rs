//! Built-in tracker collections.
//!
//! Index names follow the `by-<field>` convention used by every tracker page.

use super::{CollectionHooks, CollectionSpec, Registry, SchemaError};
use crate::lifecycle::{before_flare_add, before_flare_update, validate_flare};

pub const DEFAULT_STORE_NAME: &str = "wellhub";
pub const DEFAULT_STORE_VERSION: u32 = 2;

pub const HYDRATION: &str = "hydration";
pub const SODIUM: &str = "sodium";
pub const BODY_WEATHER: &str = "bodyWeather";
pub const PAIN_MAP: &str = "painMap";
pub const FLARE_EVENTS: &str = "flareEvents";
pub const SYMPTOMS: &str = "symptoms";
pub const SLEEP: &str = "sleepQuality";
pub const DAILY_CHECK_INS: &str = "dailyCheckIns";
pub const HABITS: &str = "habits";
pub const JOURNAL_ENTRIES: &str = "journalEntries";
pub const ADVOCACY_SCRIPTS: &str = "scripts";
pub const HEARING_PREP: &str = "hearingPrep";
pub const INSURANCE_CALLS: &str = "insuranceCalls";
pub const APPEAL_LETTERS: &str = "appealLetters";
pub const BOUNDARIES: &str = "boundaries";
pub const ACCESS_CARDS: &str = "accessCards";
pub const GOAL_SETTINGS: &str = "goalSettings";

pub const BY_DATE: &str = "by-date";
pub const BY_STATUS: &str = "by-status";
pub const BY_TYPE: &str = "by-type";
pub const BY_CATEGORY: &str = "by-category";
pub const BY_TONE: &str = "by-tone";

/// Declarations for every built-in collection.
pub fn builtin_collections() -> Vec<CollectionSpec> {
    vec![
        CollectionSpec::new(HYDRATION, "hydro")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(SODIUM, "sodium")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(BODY_WEATHER, "weather")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(PAIN_MAP, "pain")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(FLARE_EVENTS, "flare")
            .required("startDate")
            .required("startTime")
            .date_field("startDate")
            .date_field("endDate")
            .time_field("startTime")
            .time_field("endTime")
            .index(BY_STATUS, "status")
            .with_hooks(CollectionHooks {
                before_add: Some(before_flare_add),
                validate: Some(validate_flare),
                before_update: Some(before_flare_update),
            }),
        CollectionSpec::new(SYMPTOMS, "symptom")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date")
            .index(BY_TYPE, "type"),
        CollectionSpec::new(SLEEP, "sleep")
            .dated()
            .time_field("bedTime")
            .time_field("wakeTime")
            .index(BY_DATE, "date"),
        CollectionSpec::new(DAILY_CHECK_INS, "checkin")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(HABITS, "habit")
            .date_field("completedDates")
            .index(BY_CATEGORY, "category"),
        CollectionSpec::new(JOURNAL_ENTRIES, "journal")
            .dated()
            .time_field("time")
            .index(BY_DATE, "date"),
        CollectionSpec::new(ADVOCACY_SCRIPTS, "script")
            .index(BY_TONE, "tone")
            .index(BY_CATEGORY, "category"),
        CollectionSpec::new(HEARING_PREP, "hearing").date_field("hearingDate"),
        CollectionSpec::new(INSURANCE_CALLS, "call")
            .dated()
            .date_field("followUpDate")
            .index(BY_DATE, "date"),
        CollectionSpec::new(APPEAL_LETTERS, "appeal")
            .dated()
            .date_field("denialDate")
            .date_field("deadline")
            .index(BY_STATUS, "status"),
        CollectionSpec::new(BOUNDARIES, "boundary").index(BY_CATEGORY, "category"),
        // Added in store version 2.
        CollectionSpec::new(ACCESS_CARDS, "card").required("title"),
        CollectionSpec::new(GOAL_SETTINGS, "goal")
            .required("hydration")
            .required("sodium"),
    ]
}

/// Registry holding every built-in collection.
pub fn default_registry() -> Result<Registry, SchemaError> {
    Registry::new(builtin_collections())
}
