//! Connection bootstrap for store files.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and the requested busy
//!   timeout.
//! - Returned connections have engine migrations fully applied; callers
//!   never see a half-migrated file.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

/// Busy timeout applied when callers do not configure one.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Backing {
    File,
    Memory,
}

impl Backing {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating when missing) a store file and migrates it.
pub fn open_db(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let path = path.as_ref();
    connect(Backing::File, busy_timeout, || {
        Connection::open_with_flags(path, flags)
    })
}

/// Opens a private in-memory database and migrates it.
pub fn open_db_in_memory() -> DbResult<Connection> {
    connect(Backing::Memory, DEFAULT_BUSY_TIMEOUT, Connection::open_in_memory)
}

fn connect(
    backing: Backing,
    busy_timeout: Duration,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let opened = open()
        .map_err(DbError::from)
        .and_then(|mut conn| prepare(&mut conn, busy_timeout).map(|()| conn));

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            backing.as_str(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
            backing.as_str(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    opened
}

fn prepare(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)
}
