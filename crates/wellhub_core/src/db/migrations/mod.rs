//! Engine table migrations.
//!
//! Engine tables (store metadata, collection declarations, records, index
//! entries, retired ids) are shared by every named store. Their layout is
//! versioned with `PRAGMA user_version`; caller-declared collection schemas
//! are versioned separately by `store::schema`.
//!
//! # Invariants
//! - Steps are listed in strictly increasing version order.
//! - Each step commits together with its `user_version` bump, so a crash
//!   leaves the file at the last fully applied step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Step {
        version: 2,
        name: "retired_ids",
        sql: include_str!("0002_retired_ids.sql"),
    },
];

/// Highest engine schema version this build can read.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings the engine tables of `conn` up to `latest_version()`.
///
/// Files written by a newer build are refused rather than downgraded.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    for step in STEPS.iter().filter(|step| step.version > found) {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
    }

    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
