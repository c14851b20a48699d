//! Collection registry: record shapes and secondary indexes per collection.
//!
//! # Responsibility
//! - Declare each named collection, its primary key path and its indexes.
//! - Validate raw records against the declaration before they are written.
//!
//! # Invariants
//! - Collection and index names match `^[A-Za-z][A-Za-z0-9_-]*$`.
//! - Collection names are unique in a registry; index names are unique per
//!   collection.
//! - Every declared index key path is present (non-null) on every record.
//! - Declared date fields hold `YYYY-MM-DD` strings (or lists of them) and
//!   declared time fields hold `HH:MM` strings.
//!
//! # See also
//! - `registry::collections` for the built-in tracker collections.

use crate::calendar::{parse_clock, parse_day};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collections;

pub use collections::default_registry;

/// JSON object shape used for raw record bodies and patches.
pub type JsonMap = Map<String, Value>;

/// Record-level validation hook.
pub type ValidateHook = fn(&JsonMap) -> Result<(), RecordViolation>;

/// Update hook: sees the stored record and may rewrite the incoming patch.
pub type BeforeUpdateHook = fn(&JsonMap, &mut JsonMap) -> Result<(), RecordViolation>;

/// Primary key path shared by every collection.
pub const PRIMARY_KEY_PATH: &str = "id";

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid name regex"));

/// Schema declaration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidName(String),
    InvalidVersion(u32),
    DuplicateCollection(String),
    DuplicateIndex { collection: String, index: String },
    EmptyKeyPath { collection: String, index: String },
    /// Declared collections differ from the stored ones at the same version.
    ChangedWithoutVersionBump { store: String, version: u32 },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid schema name `{name}`"),
            Self::InvalidVersion(version) => {
                write!(f, "store version must be >= 1, got {version}")
            }
            Self::DuplicateCollection(name) => write!(f, "collection declared twice: {name}"),
            Self::DuplicateIndex { collection, index } => {
                write!(f, "index `{index}` declared twice on `{collection}`")
            }
            Self::EmptyKeyPath { collection, index } => {
                write!(f, "index `{index}` on `{collection}` has an empty key path")
            }
            Self::ChangedWithoutVersionBump { store, version } => write!(
                f,
                "store `{store}` schema changed without bumping version {version}"
            ),
        }
    }
}

impl Error for SchemaError {}

/// Reasons a record (or patch) is refused at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordViolation {
    NotAnObject,
    ClientSuppliedId,
    MissingField(String),
    MissingIndexedField { index: String, key_path: String },
    MalformedDate { field: String, value: String },
    MalformedTime { field: String, value: String },
    Invalid(String),
    InvalidTransition(String),
}

impl Display for RecordViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "record must be a JSON object"),
            Self::ClientSuppliedId => write!(f, "record ids are assigned by the store"),
            Self::MissingField(field) => write!(f, "required field `{field}` is missing"),
            Self::MissingIndexedField { index, key_path } => {
                write!(f, "indexed field `{key_path}` (index `{index}`) is missing")
            }
            Self::MalformedDate { field, value } => {
                write!(f, "field `{field}` holds malformed date `{value}`")
            }
            Self::MalformedTime { field, value } => {
                write!(f, "field `{field}` holds malformed time `{value}`")
            }
            Self::Invalid(message) => write!(f, "{message}"),
            Self::InvalidTransition(message) => write!(f, "invalid transition: {message}"),
        }
    }
}

impl Error for RecordViolation {}

/// Secondary index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    /// Index name used by `get_all_by_index`, e.g. `by-date`.
    pub name: String,
    /// Dotted field path inside the record body, e.g. `date`.
    pub key_path: String,
}

/// Optional per-collection behavior hooks.
#[derive(Clone, Copy, Default)]
pub struct CollectionHooks {
    /// Runs on inserts only, before `validate`.
    pub before_add: Option<ValidateHook>,
    pub validate: Option<ValidateHook>,
    pub before_update: Option<BeforeUpdateHook>,
}

impl std::fmt::Debug for CollectionHooks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionHooks")
            .field("before_add", &self.before_add.is_some())
            .field("validate", &self.validate.is_some())
            .field("before_update", &self.before_update.is_some())
            .finish()
    }
}

/// One collection declaration.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub name: String,
    pub key_path: String,
    /// Prefix for generated ids (`hydro` -> `hydro-1700000000000-x1y2z3a4b`).
    pub id_prefix: String,
    pub indexes: Vec<IndexSpec>,
    pub required_fields: Vec<String>,
    pub date_fields: Vec<String>,
    pub time_fields: Vec<String>,
    pub hooks: CollectionHooks,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, id_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: PRIMARY_KEY_PATH.to_string(),
            id_prefix: id_prefix.into(),
            indexes: Vec::new(),
            required_fields: Vec::new(),
            date_fields: Vec::new(),
            time_fields: Vec::new(),
            hooks: CollectionHooks::default(),
        }
    }

    /// Declares a secondary index.
    pub fn index(mut self, name: impl Into<String>, key_path: impl Into<String>) -> Self {
        self.indexes.push(IndexSpec {
            name: name.into(),
            key_path: key_path.into(),
        });
        self
    }

    /// Marks the collection as a dated-record collection (`date` mandatory).
    pub fn dated(self) -> Self {
        self.required("date").date_field("date")
    }

    pub fn required(mut self, field: impl Into<String>) -> Self {
        self.required_fields.push(field.into());
        self
    }

    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_fields.push(field.into());
        self
    }

    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        self.time_fields.push(field.into());
        self
    }

    pub fn with_hooks(mut self, hooks: CollectionHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Index name to key path, ordered by name.
    pub fn index_map(&self) -> BTreeMap<String, String> {
        self.indexes
            .iter()
            .map(|index| (index.name.clone(), index.key_path.clone()))
            .collect()
    }

    /// Looks up an index declaration by name.
    pub fn find_index(&self, name: &str) -> Option<&IndexSpec> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Checks one full record body (without `id`) against this declaration.
    pub fn check_record(&self, body: &JsonMap) -> Result<(), RecordViolation> {
        for field in &self.required_fields {
            if lookup_path(body, field).map_or(true, Value::is_null) {
                return Err(RecordViolation::MissingField(field.clone()));
            }
        }

        for index in &self.indexes {
            if lookup_path(body, &index.key_path).map_or(true, Value::is_null) {
                return Err(RecordViolation::MissingIndexedField {
                    index: index.name.clone(),
                    key_path: index.key_path.clone(),
                });
            }
        }

        for field in &self.date_fields {
            check_field_format(body, field, parse_day_value, |field, value| {
                RecordViolation::MalformedDate { field, value }
            })?;
        }

        for field in &self.time_fields {
            check_field_format(body, field, parse_clock_value, |field, value| {
                RecordViolation::MalformedTime { field, value }
            })?;
        }

        if let Some(validate) = self.hooks.validate {
            validate(body)?;
        }

        Ok(())
    }

    fn validate_declaration(&self) -> Result<(), SchemaError> {
        if !is_valid_name(&self.name) {
            return Err(SchemaError::InvalidName(self.name.clone()));
        }
        if !is_valid_name(&self.id_prefix) {
            return Err(SchemaError::InvalidName(self.id_prefix.clone()));
        }

        let mut seen = BTreeSet::new();
        for index in &self.indexes {
            if !is_valid_name(&index.name) {
                return Err(SchemaError::InvalidName(index.name.clone()));
            }
            if index.key_path.trim().is_empty() {
                return Err(SchemaError::EmptyKeyPath {
                    collection: self.name.clone(),
                    index: index.name.clone(),
                });
            }
            if !seen.insert(index.name.as_str()) {
                return Err(SchemaError::DuplicateIndex {
                    collection: self.name.clone(),
                    index: index.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Validated set of collection declarations for one store.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    collections: Vec<CollectionSpec>,
}

impl Registry {
    /// Builds a registry, rejecting invalid or duplicate declarations.
    pub fn new(collections: Vec<CollectionSpec>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for spec in &collections {
            spec.validate_declaration()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateCollection(spec.name.clone()));
            }
        }
        Ok(Self { collections })
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|spec| spec.name == name)
    }

    pub fn collections(&self) -> &[CollectionSpec] {
        &self.collections
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|spec| spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

/// Returns whether a collection, index or store name is acceptable.
pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

/// Resolves a dotted key path (`a.b.c`) inside a JSON object.
pub fn lookup_path<'a>(body: &'a JsonMap, key_path: &str) -> Option<&'a Value> {
    let mut segments = key_path.split('.');
    let first = segments.next()?;
    let mut current = body.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn check_field_format(
    body: &JsonMap,
    field: &str,
    accepts: fn(&str) -> bool,
    violation: fn(String, String) -> RecordViolation,
) -> Result<(), RecordViolation> {
    let Some(value) = lookup_path(body, field) else {
        return Ok(());
    };

    match value {
        Value::Null => Ok(()),
        Value::String(text) if accepts(text) => Ok(()),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(text) if accepts(text) => {}
                    other => return Err(violation(field.to_string(), render(other))),
                }
            }
            Ok(())
        }
        other => Err(violation(field.to_string(), render(other))),
    }
}

fn parse_day_value(value: &str) -> bool {
    parse_day(value).is_some()
}

fn parse_clock_value(value: &str) -> bool {
    parse_clock(value).is_some()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
