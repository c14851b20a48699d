//! Shared handle to one opened store.
//!
//! # Responsibility
//! - Own the store connection and its collection registry.
//! - Implement untyped (JSON) CRUD and indexed lookups.
//!
//! # Invariants
//! - Each public call runs inside exactly one SQLite transaction.
//! - Results of `get_all*` are in insertion order, never date order.
//! - Once a storage-class failure is seen, every later call returns
//!   `StorageUnavailable`.

use super::index_key::encode_index_key;
use super::repository::Repository;
use super::schema::{prepare_store, same_declaration, write_index_entries, SetupOutcome};
use super::{StoreError, StoreResult};
use crate::model::record::{CollectionRecord, RecordId};
use crate::registry::{
    CollectionSpec, JsonMap, RecordViolation, Registry, SchemaError, PRIMARY_KEY_PATH,
};
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

struct HandleState {
    conn: Connection,
    version: u32,
    registry: Registry,
    unavailable: Option<String>,
}

/// Handle returned by `StoreEngine::open`; shared by every caller of the
/// same store name.
pub struct StoreHandle {
    name: String,
    state: Mutex<HandleState>,
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").field("name", &self.name).finish()
    }
}

impl StoreHandle {
    pub(crate) fn new(name: &str, conn: Connection, version: u32, registry: Registry) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(HandleState {
                conn,
                version,
                registry,
                unavailable: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currently applied schema version.
    pub fn version(&self) -> StoreResult<u32> {
        Ok(self.lock_state()?.version)
    }

    /// Declared collection names, in declaration order.
    pub fn collection_names(&self) -> StoreResult<Vec<String>> {
        let state = self.lock_state()?;
        Ok(state
            .registry
            .collection_names()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Typed repository bound to `T::COLLECTION`.
    pub fn repository<T: CollectionRecord>(&self) -> Repository<'_, T> {
        Repository::new(self)
    }

    /// Re-runs schema setup when `version` is newer than the applied one.
    ///
    /// At the applied version the declaration must match the loaded one.
    pub(crate) fn ensure_version(
        &self,
        version: u32,
        registry: Registry,
    ) -> StoreResult<SetupOutcome> {
        self.run("store_upgrade", "-", |state| {
            if version == state.version {
                if !same_declaration(&state.registry, &registry) {
                    return Err(StoreError::Schema(SchemaError::ChangedWithoutVersionBump {
                        store: self.name.clone(),
                        version,
                    }));
                }
                return Ok(SetupOutcome::Unchanged);
            }
            if version < state.version {
                return Err(StoreError::VersionDowngrade {
                    store: self.name.clone(),
                    stored: state.version,
                    requested: version,
                });
            }

            let outcome = prepare_store(&mut state.conn, &self.name, version, &registry)?;
            state.version = version;
            state.registry = registry;
            Ok(outcome)
        })
    }

    /// Inserts a record and returns its store-assigned id.
    pub fn add(&self, collection: &str, record: Value) -> StoreResult<RecordId> {
        self.run("record_add", collection, |state| {
            let HandleState { conn, registry, .. } = state;
            let spec = spec_for(registry, collection)?;
            let body = into_object(record)?;
            if body.contains_key(PRIMARY_KEY_PATH) {
                return Err(RecordViolation::ClientSuppliedId.into());
            }
            if let Some(before_add) = spec.hooks.before_add {
                before_add(&body)?;
            }
            spec.check_record(&body)?;

            let id = RecordId::generate(&spec.id_prefix);
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if is_retired(&tx, collection, &id)? {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    id,
                });
            }

            let body_text = serde_json::to_string(&body)?;
            let inserted = tx.execute(
                "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3);",
                params![collection, id.as_str(), body_text],
            );
            if let Err(err) = inserted {
                let err = crate::db::DbError::from(err);
                if err.is_unique_violation() {
                    return Err(StoreError::DuplicateKey {
                        collection: collection.to_string(),
                        id,
                    });
                }
                return Err(err.into());
            }

            let seq = tx.last_insert_rowid();
            write_index_entries(&tx, spec, seq, &body)?;
            tx.commit()?;
            Ok(id)
        })
    }

    /// Fetches one record by id.
    pub fn get(&self, collection: &str, id: &RecordId) -> StoreResult<Value> {
        self.run("record_get", collection, |state| {
            spec_for(&state.registry, collection)?;
            let (_, body) = load_record(&state.conn, collection, id)?.ok_or_else(|| {
                StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                }
            })?;
            Ok(with_id(id, body))
        })
    }

    /// Full scan in insertion order.
    pub fn get_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        self.run("record_list", collection, |state| {
            spec_for(&state.registry, collection)?;
            let mut stmt = state.conn.prepare(
                "SELECT id, body FROM records WHERE collection = ?1 ORDER BY seq ASC;",
            )?;
            let rows = stmt.query(params![collection])?;
            collect_records(rows, collection)
        })
    }

    /// Records whose indexed field equals `value`, in insertion order.
    pub fn get_all_by_index(
        &self,
        collection: &str,
        index: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        self.run("record_index_query", collection, |state| {
            let spec = spec_for(&state.registry, collection)?;
            if spec.find_index(index).is_none() {
                return Err(StoreError::UnknownIndex {
                    collection: collection.to_string(),
                    index: index.to_string(),
                });
            }

            let mut stmt = state.conn.prepare(
                "SELECT r.id, r.body
                 FROM record_index_entries e
                 INNER JOIN records r ON r.seq = e.record_seq
                 WHERE e.collection = ?1
                   AND e.index_name = ?2
                   AND e.value = ?3
                 ORDER BY r.seq ASC;",
            )?;
            let rows = stmt.query(params![collection, index, encode_index_key(value)])?;
            collect_records(rows, collection)
        })
    }

    /// Shallow-merges `patch` into the stored record and returns the result.
    pub fn update(&self, collection: &str, id: &RecordId, patch: Value) -> StoreResult<Value> {
        self.run("record_update", collection, |state| {
            let HandleState { conn, registry, .. } = state;
            let spec = spec_for(registry, collection)?;
            let mut patch = into_object(patch)?;
            if let Some(patched_id) = patch.remove(PRIMARY_KEY_PATH) {
                if patched_id.as_str() != Some(id.as_str()) {
                    return Err(RecordViolation::ClientSuppliedId.into());
                }
            }

            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let (seq, mut body) =
                load_record(&tx, collection, id)?.ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                })?;

            if let Some(before_update) = spec.hooks.before_update {
                before_update(&body, &mut patch)?;
            }
            body.extend(patch);
            spec.check_record(&body)?;

            tx.execute(
                "UPDATE records
                 SET body = ?1, updated_at = (strftime('%s', 'now') * 1000)
                 WHERE seq = ?2;",
                params![serde_json::to_string(&body)?, seq],
            )?;
            tx.execute(
                "DELETE FROM record_index_entries WHERE record_seq = ?1;",
                [seq],
            )?;
            write_index_entries(&tx, spec, seq, &body)?;
            tx.commit()?;
            Ok(with_id(id, body))
        })
    }

    /// Deletes a record and retires its id.
    pub fn delete(&self, collection: &str, id: &RecordId) -> StoreResult<()> {
        self.run("record_delete", collection, |state| {
            spec_for(&state.registry, collection)?;
            let tx = state
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;
            let Some((seq, _)) = load_record(&tx, collection, id)? else {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                });
            };

            tx.execute("DELETE FROM records WHERE seq = ?1;", [seq])?;
            tx.execute(
                "INSERT OR IGNORE INTO retired_ids (collection, id) VALUES (?1, ?2);",
                params![collection, id.as_str()],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: &str) -> StoreResult<usize> {
        self.run("record_count", collection, |state| {
            spec_for(&state.registry, collection)?;
            let count: i64 = state.conn.query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1;",
                [collection],
                |row| row.get(0),
            )?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }

    fn lock_state(&self) -> StoreResult<MutexGuard<'_, HandleState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::StorageUnavailable {
                store: self.name.clone(),
                reason: "store handle lock poisoned".to_string(),
            })
    }

    fn run<T>(
        &self,
        event: &'static str,
        collection: &str,
        op: impl FnOnce(&mut HandleState) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let mut state = self.lock_state()?;

        if let Some(reason) = state.unavailable.as_ref() {
            warn!(
                "event={event} module=store status=error store={} collection={collection} error_code=storage_unavailable",
                self.name
            );
            return Err(StoreError::StorageUnavailable {
                store: self.name.clone(),
                reason: reason.clone(),
            });
        }

        match op(&mut *state) {
            Ok(value) => {
                debug!(
                    "event={event} module=store status=ok store={} collection={collection} duration_ms={}",
                    self.name,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) if err.is_storage_failure() => {
                let reason = err.to_string();
                error!(
                    "event={event} module=store status=error store={} collection={collection} duration_ms={} error_code=storage_unavailable error={}",
                    self.name,
                    started_at.elapsed().as_millis(),
                    reason
                );
                state.unavailable = Some(reason.clone());
                Err(StoreError::StorageUnavailable {
                    store: self.name.clone(),
                    reason,
                })
            }
            Err(err) => {
                warn!(
                    "event={event} module=store status=error store={} collection={collection} duration_ms={} error_code={}",
                    self.name,
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                Err(err)
            }
        }
    }
}

fn spec_for<'r>(registry: &'r Registry, collection: &str) -> StoreResult<&'r CollectionSpec> {
    registry
        .get(collection)
        .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
}

fn into_object(value: Value) -> StoreResult<JsonMap> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RecordViolation::NotAnObject.into()),
    }
}

fn with_id(id: &RecordId, mut body: JsonMap) -> Value {
    body.insert(
        PRIMARY_KEY_PATH.to_string(),
        Value::String(id.as_str().to_string()),
    );
    Value::Object(body)
}

fn is_retired(tx: &Transaction<'_>, collection: &str, id: &RecordId) -> StoreResult<bool> {
    let retired: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM retired_ids WHERE collection = ?1 AND id = ?2);",
        params![collection, id.as_str()],
        |row| row.get(0),
    )?;
    Ok(retired == 1)
}

fn load_record(
    conn: &Connection,
    collection: &str,
    id: &RecordId,
) -> StoreResult<Option<(i64, JsonMap)>> {
    let row = conn
        .query_row(
            "SELECT seq, body FROM records WHERE collection = ?1 AND id = ?2;",
            params![collection, id.as_str()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    match row {
        Some((seq, body_text)) => Ok(Some((seq, parse_body(collection, &body_text)?))),
        None => Ok(None),
    }
}

fn collect_records(mut rows: rusqlite::Rows<'_>, collection: &str) -> StoreResult<Vec<Value>> {
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let id = RecordId::from(row.get::<_, String>(0)?);
        let body_text: String = row.get(1)?;
        records.push(with_id(&id, parse_body(collection, &body_text)?));
    }
    Ok(records)
}

fn parse_body(collection: &str, body_text: &str) -> StoreResult<JsonMap> {
    serde_json::from_str(body_text).map_err(|err| {
        StoreError::InvalidData(format!("invalid body in `{collection}`: {err}"))
    })
}
