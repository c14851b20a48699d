//! SQLite files behind named stores.
//!
//! `open` hands out configured connections, `migrations` owns the engine
//! tables. Collection schemas declared by callers live one level up, in
//! `store::schema`, and are versioned in `store_meta` rather than in
//! `PRAGMA user_version`.

use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

/// Connection-level failures.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    fn sqlite_code(&self) -> Option<(ErrorCode, i32)> {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                Some((err.code, err.extended_code))
            }
            _ => None,
        }
    }

    /// True when the file itself cannot be used (I/O, permissions, corruption),
    /// as opposed to a failure of one statement.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self.sqlite_code(),
            Some((
                ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DiskFull
                    | ErrorCode::PermissionDenied
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::ReadOnly
                    | ErrorCode::OutOfMemory,
                _
            ))
        )
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.sqlite_code(),
            Some((
                ErrorCode::ConstraintViolation,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ))
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store file uses engine schema {db_version}; this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
