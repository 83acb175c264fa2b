//! Event registry persistence.
//!
//! # Invariants
//! - One row per event id; rows are only ever inserted.
//! - Rows failing `Event::validate()` are reported as `InvalidData`.

use crate::model::event::{Event, EventId};
use crate::model::identity::Principal;
use crate::repo::{ensure_table_ready, u64_from_db, u64_to_db, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    organizer,
    start_mark,
    end_mark,
    title
FROM events";

/// Query options for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListQuery {
    /// Only events registered by this principal.
    pub organizer: Option<Principal>,
}

/// Repository interface for the event registry.
pub trait EventRepository {
    fn insert_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn event_exists(&self, id: EventId) -> RepoResult<bool>;
    /// Lists events ordered by `(start_mark, id)`.
    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>>;
}

/// SQLite-backed event registry.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "events",
            &["id", "organizer", "start_mark", "end_mark", "title"],
        )?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(&self, event: &Event) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO events (id, organizer, start_mark, end_mark, title)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                u64_to_db(event.id),
                event.organizer.as_str(),
                u64_to_db(event.start_mark),
                u64_to_db(event.end_mark),
                event.title.as_str(),
            ],
        )?;
        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([u64_to_db(id)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_event_row(row)?)),
            None => Ok(None),
        }
    }

    fn event_exists(&self, id: EventId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM events WHERE id = ?1;",
                [u64_to_db(id)],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        let mut events = Vec::new();
        match &query.organizer {
            Some(organizer) => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{EVENT_SELECT_SQL} WHERE organizer = ?1;"))?;
                let mut rows = stmt.query([organizer.as_str()])?;
                while let Some(row) = rows.next()? {
                    events.push(parse_event_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!("{EVENT_SELECT_SQL};"))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    events.push(parse_event_row(row)?);
                }
            }
        }

        // Bit-cast columns do not sort correctly in SQL.
        events.sort_by_key(|event| (event.start_mark, event.id));
        Ok(events)
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let event = Event {
        id: u64_from_db(row.get("id")?),
        organizer: Principal::new(row.get::<_, String>("organizer")?),
        start_mark: u64_from_db(row.get("start_mark")?),
        end_mark: u64_from_db(row.get("end_mark")?),
        title: row.get("title")?,
    };
    event.validate().map_err(|err| {
        RepoError::InvalidData(format!("event {} in events: {err}", event.id))
    })?;
    Ok(event)
}
