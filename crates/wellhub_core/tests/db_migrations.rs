use rusqlite::Connection;
use std::time::Duration;
use wellhub_core::db::migrations::latest_version;
use wellhub_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "store_meta",
        "collections",
        "collection_indexes",
        "records",
        "record_index_entries",
        "retired_ids",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_file_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wellhub.sqlite3");

    let first = open_db(&path, Duration::from_millis(500)).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path, Duration::from_millis(500)).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "records");
}

#[test]
fn newer_engine_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path, Duration::from_millis(500)).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn record_seq_is_never_reused() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO collections (name, id_prefix) VALUES ('notes', 'note');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO records (collection, id, body) VALUES ('notes', 'a', '{}');",
        [],
    )
    .unwrap();
    let first = conn.last_insert_rowid();
    conn.execute("DELETE FROM records WHERE seq = ?1;", [first])
        .unwrap();
    conn.execute(
        "INSERT INTO records (collection, id, body) VALUES ('notes', 'b', '{}');",
        [],
    )
    .unwrap();
    assert!(conn.last_insert_rowid() > first);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
