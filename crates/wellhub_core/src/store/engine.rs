//! Named-store registry for one process.
//!
//! # Responsibility
//! - Resolve a store name to its backing SQLite connection.
//! - Run schema setup once per (name, version) and share the handle.
//! - Remember stores whose storage failed so callers fail fast.

use super::handle::StoreHandle;
use super::schema::prepare_store;
use super::{StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};
use crate::registry::collections::{builtin_collections, DEFAULT_STORE_NAME, DEFAULT_STORE_VERSION};
use crate::registry::{is_valid_name, CollectionSpec, Registry, SchemaError};
use log::{error, info};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Where store files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// One `{name}.sqlite3` file per store inside this directory.
    Directory(PathBuf),
    /// Private in-memory database per store name; gone when the engine drops.
    Memory,
}

#[derive(Default)]
struct EngineState {
    handles: HashMap<String, Arc<StoreHandle>>,
    unavailable: HashMap<String, String>,
}

/// Entry point for opening stores.
pub struct StoreEngine {
    location: StoreLocation,
    busy_timeout: Duration,
    default_store: String,
    state: Mutex<EngineState>,
}

impl StoreEngine {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            default_store: DEFAULT_STORE_NAME.to_string(),
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreLocation::Memory)
    }

    /// Engine configured from the `[storage]` config section.
    pub fn from_config(config: &crate::config::StorageConfig) -> Self {
        Self {
            location: StoreLocation::Directory(config.data_dir.clone()),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            default_store: config.database_name.clone(),
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Opens the default store with every built-in collection.
    pub fn open_default(&self) -> StoreResult<Arc<StoreHandle>> {
        let name = self.default_store.clone();
        self.open(&name, DEFAULT_STORE_VERSION, builtin_collections())
    }

    /// Opens (creating or upgrading) a named store.
    ///
    /// Repeated calls with the same name and version return the same handle
    /// without re-running setup. A higher version upgrades the live handle.
    pub fn open(
        &self,
        name: &str,
        version: u32,
        collections: Vec<CollectionSpec>,
    ) -> StoreResult<Arc<StoreHandle>> {
        if !is_valid_name(name) {
            return Err(SchemaError::InvalidName(name.to_string()).into());
        }
        if version == 0 {
            return Err(SchemaError::InvalidVersion(version).into());
        }
        let registry = Registry::new(collections)?;

        let mut state = self.state.lock().map_err(|_| StoreError::StorageUnavailable {
            store: name.to_string(),
            reason: "store engine lock poisoned".to_string(),
        })?;

        if let Some(reason) = state.unavailable.get(name) {
            return Err(StoreError::StorageUnavailable {
                store: name.to_string(),
                reason: reason.clone(),
            });
        }

        if let Some(handle) = state.handles.get(name) {
            let outcome = handle.ensure_version(version, registry)?;
            info!(
                "event=store_open module=store status=ok store={name} version={version} outcome={outcome} cached=true"
            );
            return Ok(Arc::clone(handle));
        }

        let started_at = Instant::now();
        info!("event=store_open module=store status=start store={name} version={version}");

        let mut conn = match self.connect(name) {
            Ok(conn) => conn,
            Err(reason) => {
                error!(
                    "event=store_open module=store status=error store={name} duration_ms={} error_code=storage_unavailable error={reason}",
                    started_at.elapsed().as_millis()
                );
                state.unavailable.insert(name.to_string(), reason.clone());
                return Err(StoreError::StorageUnavailable {
                    store: name.to_string(),
                    reason,
                });
            }
        };

        let outcome = match prepare_store(&mut conn, name, version, &registry) {
            Ok(outcome) => outcome,
            Err(err) if err.is_storage_failure() => {
                let reason = err.to_string();
                error!(
                    "event=store_open module=store status=error store={name} duration_ms={} error_code=storage_unavailable error={reason}",
                    started_at.elapsed().as_millis()
                );
                state.unavailable.insert(name.to_string(), reason.clone());
                return Err(StoreError::StorageUnavailable {
                    store: name.to_string(),
                    reason,
                });
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error store={name} duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                return Err(err);
            }
        };

        info!(
            "event=store_open module=store status=ok store={name} version={version} outcome={outcome} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        let handle = Arc::new(StoreHandle::new(name, conn, version, registry));
        state.handles.insert(name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Returns whether `name` failed to open earlier in this engine.
    pub fn is_unavailable(&self, name: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.unavailable.contains_key(name))
            .unwrap_or(true)
    }

    fn connect(&self, name: &str) -> Result<Connection, String> {
        let opened = match &self.location {
            StoreLocation::Memory => open_db_in_memory(),
            StoreLocation::Directory(dir) => {
                std::fs::create_dir_all(dir)
                    .map_err(|err| format!("cannot create {}: {err}", dir.display()))?;
                open_db(dir.join(format!("{name}.sqlite3")), self.busy_timeout)
            }
        };

        opened.map_err(|err| format!("cannot open store file: {err}"))
    }
}
