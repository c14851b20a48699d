//! Local-first record store and derived analytics for the wellhub trackers.
//! This crate owns every data invariant; UI layers only call into it.

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod db;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod registry;
pub mod service;
pub mod store;

pub use analytics::{GoalThresholds, GoalTier};
pub use config::{ConfigError, WellhubConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::record::{CollectionRecord, Dated, Record, RecordId};
pub use registry::collections::{builtin_collections, default_registry};
pub use registry::{CollectionSpec, IndexSpec, Registry};
pub use service::{ServiceError, ServiceResult};
pub use store::{Repository, StoreEngine, StoreError, StoreHandle, StoreLocation, StoreResult};

/// Liveness check for embedding layers.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
