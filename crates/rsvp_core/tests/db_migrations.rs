use rsvp_core::db::migrations::{applied_version, latest_version};
use rsvp_core::db::{open_db, open_db_in_memory, DbError};
use rsvp_core::{RepoError, SqliteEscapeRepository, SqliteEventRepository, SqliteRsvpRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(applied_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "events");
    assert_table_exists(&conn, "rsvps");
    assert_table_exists(&conn, "escape_hatches");
}

#[test]
fn reopening_file_database_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO events (id, organizer, start_mark, end_mark, title)
         VALUES (1, 'alice', 10, 20, 'kickoff');",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(applied_version(&conn).unwrap(), latest_version());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn repositories_refuse_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(matches!(
        SqliteEventRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("events"))
    ));
    assert!(matches!(
        SqliteRsvpRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("rsvps"))
    ));
    assert!(matches!(
        SqliteEscapeRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("escape_hatches"))
    ));
}

#[test]
fn repository_reports_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE rsvps (event_id INTEGER, attendee TEXT);")
        .unwrap();

    assert!(matches!(
        SqliteRsvpRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "rsvps",
            column: "status"
        })
    ));
}

#[test]
fn schema_rejects_out_of_range_confidence_and_inconsistent_trigger() {
    let conn = open_db_in_memory().unwrap();

    let bad_confidence = conn.execute(
        "INSERT INTO rsvps (event_id, attendee, status, confidence, updated_at)
         VALUES (1, 'bob', 'maybe', 101, 0);",
        [],
    );
    assert!(bad_confidence.is_err());

    let bad_trigger = conn.execute(
        "INSERT INTO escape_hatches (meeting_id, participant, reason, declared_at, triggered)
         VALUES (1, 'bob', 'flat tire', 0, 1);",
        [],
    );
    assert!(bad_trigger.is_err());
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
