//! Store engine: named stores, typed CRUD and indexed queries.
//!
//! # Responsibility
//! - Open (create/upgrade) named stores once and share their handles.
//! - Expose CRUD plus secondary-index lookups per declared collection.
//! - Surface every failure to the immediate caller, never retrying.
//!
//! # Invariants
//! - Every call is scoped to exactly one collection and one transaction.
//! - Ids are assigned by the store and never reused, even after deletion.
//! - A store that failed to open stays unavailable for the engine lifetime.
//! - Concurrent writers are not detected: last write wins.

use crate::db::DbError;
use crate::model::record::RecordId;
use crate::registry::{RecordViolation, SchemaError};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod engine;
mod handle;
mod index_key;
pub mod repository;
mod schema;

pub use engine::{StoreEngine, StoreLocation};
pub use handle::StoreHandle;
pub use index_key::encode_index_key;
pub use repository::Repository;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The platform cannot open or keep the store. Terminal for the handle.
    StorageUnavailable { store: String, reason: String },
    NotFound { collection: String, id: RecordId },
    /// Id collision with a live or retired record.
    DuplicateKey { collection: String, id: RecordId },
    MalformedDate { field: String, value: String },
    UnknownCollection(String),
    UnknownIndex { collection: String, index: String },
    MissingIndexedField { index: String, key_path: String },
    /// Record shape rejected at write time.
    Validation(RecordViolation),
    /// Lifecycle rule violated (e.g. re-resolving a resolved flare).
    InvalidTransition(String),
    VersionDowngrade {
        store: String,
        stored: u32,
        requested: u32,
    },
    Schema(SchemaError),
    Db(DbError),
    InvalidData(String),
}

impl StoreError {
    /// Stable snake_case code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::MalformedDate { .. } => "malformed_date",
            Self::UnknownCollection(_) => "unknown_collection",
            Self::UnknownIndex { .. } => "unknown_index",
            Self::MissingIndexedField { .. } => "missing_indexed_field",
            Self::Validation(_) => "validation_failed",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::VersionDowngrade { .. } => "version_downgrade",
            Self::Schema(_) => "schema_error",
            Self::Db(_) => "db_error",
            Self::InvalidData(_) => "invalid_data",
        }
    }

    pub(crate) fn is_storage_failure(&self) -> bool {
        match self {
            Self::StorageUnavailable { .. } => true,
            Self::Db(err) => err.is_storage_failure(),
            _ => false,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { store, reason } => {
                write!(f, "store `{store}` is unavailable: {reason}")
            }
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::DuplicateKey { collection, id } => {
                write!(f, "{collection} record id already used: {id}")
            }
            Self::MalformedDate { field, value } => {
                write!(f, "field `{field}` holds malformed date `{value}`")
            }
            Self::UnknownCollection(name) => write!(f, "unknown collection: {name}"),
            Self::UnknownIndex { collection, index } => {
                write!(f, "unknown index `{index}` on collection `{collection}`")
            }
            Self::MissingIndexedField { index, key_path } => {
                write!(f, "indexed field `{key_path}` (index `{index}`) is missing")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTransition(message) => write!(f, "invalid transition: {message}"),
            Self::VersionDowngrade {
                store,
                stored,
                requested,
            } => write!(
                f,
                "store `{store}` is at version {stored}; cannot open at older version {requested}"
            ),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordViolation> for StoreError {
    fn from(value: RecordViolation) -> Self {
        match value {
            RecordViolation::MalformedDate { field, value } => Self::MalformedDate { field, value },
            RecordViolation::MissingIndexedField { index, key_path } => {
                Self::MissingIndexedField { index, key_path }
            }
            RecordViolation::InvalidTransition(message) => Self::InvalidTransition(message),
            other => Self::Validation(other),
        }
    }
}

impl From<SchemaError> for StoreError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}
