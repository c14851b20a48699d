use crate::calendar::ClockTime;
use crate::model::record::{CollectionRecord, Dated};
use crate::registry::collections::JOURNAL_ENTRIES;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    pub title: String,
    pub content: String,
    /// 1..=5
    pub mood: u8,
    /// 1..=5
    pub energy: u8,
    #[serde(default)]
    pub gratitude: Vec<String>,
    #[serde(default)]
    pub highlights: String,
    #[serde(default)]
    pub challenges: String,
    #[serde(default)]
    pub tomorrow: String,
    #[serde(default, alias = "tags")]
    pub related_tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl CollectionRecord for JournalEntry {
    const COLLECTION: &'static str = JOURNAL_ENTRIES;
}

impl Dated for JournalEntry {
    fn day(&self) -> NaiveDate {
        self.date
    }
}
