//! Generic dated-record envelope.
//!
//! # Responsibility
//! - Define the store-assigned `RecordId` and its generation scheme.
//! - Wrap collection payloads in `Record<T>` (`id` + flattened fields).
//!
//! # Invariants
//! - Ids are generated by the store only, never supplied by callers.
//! - Ids follow `{prefix}-{epoch_millis}-{9 lowercase alphanumerics}`.

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 9;

/// Opaque store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh id: creation timestamp plus a random suffix.
    pub fn generate(prefix: &str) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(ID_SUFFIX_LEN)
            .collect();
        Self(format!(
            "{prefix}-{}-{suffix}",
            Utc::now().timestamp_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Stored record: assigned id plus the collection-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: T,
}

/// Payload type bound to one named collection.
pub trait CollectionRecord: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
}

/// Payloads carrying a calendar day used for windowing and history.
pub trait Dated {
    fn day(&self) -> NaiveDate;
}

impl<T: Dated> Dated for Record<T> {
    fn day(&self) -> NaiveDate {
        self.fields.day()
    }
}
