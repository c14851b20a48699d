//! Per-store collection schema setup.
//!
//! # Responsibility
//! - Record declared collections and indexes in the store file.
//! - Run upgrade work only when the declared version grows.
//! - Keep `record_index_entries` in sync with record bodies.
//!
//! # Invariants
//! - A declared version lower than the stored one is refused.
//! - At an unchanged version every declared collection and index must match
//!   the stored declaration.
//! - New or changed indexes are back-filled from existing records.

use super::index_key::encode_index_key;
use super::{StoreError, StoreResult};
use crate::registry::{lookup_path, CollectionSpec, IndexSpec, JsonMap, Registry, SchemaError};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// What `prepare_store` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetupOutcome {
    Created,
    Upgraded { from: u32 },
    Unchanged,
}

impl Display for SetupOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Upgraded { from } => write!(f, "upgraded_from_{from}"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Creates, upgrades or verifies the collection schema of one store.
pub(crate) fn prepare_store(
    conn: &mut Connection,
    store: &str,
    version: u32,
    registry: &Registry,
) -> StoreResult<SetupOutcome> {
    match stored_version(conn, store)? {
        None => {
            install(conn, store, version, registry)?;
            Ok(SetupOutcome::Created)
        }
        Some(stored) if stored > version => Err(StoreError::VersionDowngrade {
            store: store.to_string(),
            stored,
            requested: version,
        }),
        Some(stored) if stored == version => {
            verify_schema(conn, store, version, registry)?;
            Ok(SetupOutcome::Unchanged)
        }
        Some(stored) => {
            install(conn, store, version, registry)?;
            Ok(SetupOutcome::Upgraded { from: stored })
        }
    }
}

/// Writes index entries for one record.
///
/// Missing indexed fields are skipped; write paths reject them earlier via
/// `CollectionSpec::check_record`, so only pre-upgrade rows can hit this.
pub(crate) fn write_index_entries(
    tx: &Transaction<'_>,
    spec: &CollectionSpec,
    seq: i64,
    body: &JsonMap,
) -> StoreResult<()> {
    for index in &spec.indexes {
        insert_index_entry(tx, &spec.name, index, seq, body)?;
    }
    Ok(())
}

fn insert_index_entry(
    tx: &Transaction<'_>,
    collection: &str,
    index: &IndexSpec,
    seq: i64,
    body: &JsonMap,
) -> StoreResult<bool> {
    let Some(value) = lookup_path(body, &index.key_path).filter(|value| !value.is_null()) else {
        return Ok(false);
    };

    tx.execute(
        "INSERT INTO record_index_entries (record_seq, collection, index_name, value)
         VALUES (?1, ?2, ?3, ?4);",
        params![seq, collection, index.name.as_str(), encode_index_key(value)],
    )?;
    Ok(true)
}

fn stored_version(conn: &Connection, store: &str) -> StoreResult<Option<u32>> {
    let version = conn
        .query_row(
            "SELECT version FROM store_meta WHERE name = ?1;",
            [store],
            |row| row.get::<_, u32>(0),
        )
        .optional()?;
    Ok(version)
}

fn install(conn: &mut Connection, store: &str, version: u32, registry: &Registry) -> StoreResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO store_meta (name, version) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET
            version = excluded.version,
            upgraded_at = (strftime('%s', 'now') * 1000);",
        params![store, version],
    )?;

    for spec in registry.collections() {
        tx.execute(
            "INSERT INTO collections (name, key_path, id_prefix) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                key_path = excluded.key_path,
                id_prefix = excluded.id_prefix;",
            params![spec.name.as_str(), spec.key_path.as_str(), spec.id_prefix.as_str()],
        )?;
        sync_indexes(&tx, spec)?;
    }

    tx.commit()?;
    Ok(())
}

fn sync_indexes(tx: &Transaction<'_>, spec: &CollectionSpec) -> StoreResult<()> {
    let stored = load_indexes(tx, &spec.name)?;

    for (name, key_path) in &stored {
        let still_declared = spec
            .find_index(name)
            .is_some_and(|index| &index.key_path == key_path);
        if !still_declared {
            tx.execute(
                "DELETE FROM collection_indexes WHERE collection = ?1 AND name = ?2;",
                params![spec.name.as_str(), name.as_str()],
            )?;
            info!(
                "event=index_drop module=store status=ok collection={} index={}",
                spec.name, name
            );
        }
    }

    for index in &spec.indexes {
        if stored.get(&index.name) == Some(&index.key_path) {
            continue;
        }
        tx.execute(
            "INSERT INTO collection_indexes (collection, name, key_path) VALUES (?1, ?2, ?3);",
            params![spec.name.as_str(), index.name.as_str(), index.key_path.as_str()],
        )?;
        backfill_index(tx, &spec.name, index)?;
    }

    Ok(())
}

fn backfill_index(tx: &Transaction<'_>, collection: &str, index: &IndexSpec) -> StoreResult<()> {
    let mut stmt = tx.prepare(
        "SELECT seq, body FROM records WHERE collection = ?1 ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([collection])?;
    let mut indexed = 0usize;
    let mut skipped = 0usize;

    while let Some(row) = rows.next()? {
        let seq: i64 = row.get(0)?;
        let body_text: String = row.get(1)?;
        let body: JsonMap = serde_json::from_str(&body_text).map_err(|err| {
            StoreError::InvalidData(format!("record seq {seq} in `{collection}`: {err}"))
        })?;
        if insert_index_entry(tx, collection, index, seq, &body)? {
            indexed += 1;
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!(
            "event=index_backfill module=store status=partial collection={} index={} indexed={} skipped={}",
            collection, index.name, indexed, skipped
        );
    } else {
        info!(
            "event=index_backfill module=store status=ok collection={} index={} indexed={}",
            collection, index.name, indexed
        );
    }
    Ok(())
}

fn verify_schema(
    conn: &Connection,
    store: &str,
    version: u32,
    registry: &Registry,
) -> StoreResult<()> {
    let mut stored_collections = BTreeSet::new();
    {
        let mut stmt = conn.prepare("SELECT name FROM collections;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            stored_collections.insert(row.get::<_, String>(0)?);
        }
    }

    let changed = || {
        StoreError::Schema(SchemaError::ChangedWithoutVersionBump {
            store: store.to_string(),
            version,
        })
    };

    // Collections dropped by an earlier upgrade keep their rows; only the
    // declared ones must match.
    for spec in registry.collections() {
        if !stored_collections.contains(&spec.name) {
            return Err(changed());
        }
        if load_indexes(conn, &spec.name)? != spec.index_map() {
            return Err(changed());
        }
    }

    Ok(())
}

/// Same check as the fresh-open verification, against a registry already
/// loaded by a live handle.
pub(crate) fn same_declaration(current: &Registry, incoming: &Registry) -> bool {
    incoming.collections().iter().all(|spec| {
        current
            .get(&spec.name)
            .is_some_and(|known| known.index_map() == spec.index_map())
    })
}

fn load_indexes(conn: &Connection, collection: &str) -> StoreResult<BTreeMap<String, String>> {
    let mut stmt = conn.prepare(
        "SELECT name, key_path FROM collection_indexes WHERE collection = ?1;",
    )?;
    let mut rows = stmt.query([collection])?;
    let mut indexes = BTreeMap::new();
    while let Some(row) = rows.next()? {
        indexes.insert(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
    }
    Ok(indexes)
}
