//! RSVP ledger persistence.
//!
//! # Invariants
//! - At most one row per `(event_id, attendee)`.
//! - `upsert_rsvp` is a single statement; it never leaves a partial row.

use crate::model::event::EventId;
use crate::model::identity::Principal;
use crate::model::rsvp::{RsvpRecord, RsvpStatus};
use crate::repo::{ensure_table_ready, u64_from_db, u64_to_db, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const RSVP_SELECT_SQL: &str = "SELECT
    event_id,
    attendee,
    status,
    confidence,
    updated_at
FROM rsvps";

pub trait RsvpRepository {
    /// Inserts or overwrites the record at its `(event_id, attendee)` key.
    fn upsert_rsvp(&self, record: &RsvpRecord) -> RepoResult<()>;
    fn get_rsvp(&self, event_id: EventId, attendee: &Principal) -> RepoResult<Option<RsvpRecord>>;
    /// Returns whether a row was removed.
    fn delete_rsvp(&self, event_id: EventId, attendee: &Principal) -> RepoResult<bool>;
    /// Lists every record for one event, ordered by attendee.
    fn list_rsvps(&self, event_id: EventId) -> RepoResult<Vec<RsvpRecord>>;
}

/// SQLite-backed RSVP ledger.
pub struct SqliteRsvpRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRsvpRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "rsvps",
            &["event_id", "attendee", "status", "confidence", "updated_at"],
        )?;
        Ok(Self { conn })
    }
}

impl RsvpRepository for SqliteRsvpRepository<'_> {
    fn upsert_rsvp(&self, record: &RsvpRecord) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO rsvps (event_id, attendee, status, confidence, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (event_id, attendee) DO UPDATE SET
                status = excluded.status,
                confidence = excluded.confidence,
                updated_at = excluded.updated_at;",
            params![
                u64_to_db(record.event_id),
                record.attendee.as_str(),
                record.status.as_str(),
                record.confidence,
                u64_to_db(record.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_rsvp(&self, event_id: EventId, attendee: &Principal) -> RepoResult<Option<RsvpRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RSVP_SELECT_SQL} WHERE event_id = ?1 AND attendee = ?2;"
        ))?;
        let mut rows = stmt.query(params![u64_to_db(event_id), attendee.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_rsvp_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_rsvp(&self, event_id: EventId, attendee: &Principal) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM rsvps WHERE event_id = ?1 AND attendee = ?2;",
            params![u64_to_db(event_id), attendee.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn list_rsvps(&self, event_id: EventId) -> RepoResult<Vec<RsvpRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{RSVP_SELECT_SQL} WHERE event_id = ?1 ORDER BY attendee ASC;"
        ))?;
        let mut rows = stmt.query([u64_to_db(event_id)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_rsvp_row(row)?);
        }
        Ok(records)
    }
}

fn parse_rsvp_row(row: &Row<'_>) -> RepoResult<RsvpRecord> {
    let status_text: String = row.get("status")?;
    let status = RsvpStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid rsvp status `{status_text}` in rsvps.status"))
    })?;

    let confidence_raw: i64 = row.get("confidence")?;
    let confidence = u8::try_from(confidence_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid confidence `{confidence_raw}` in rsvps.confidence"
        ))
    })?;

    let record = RsvpRecord {
        event_id: u64_from_db(row.get("event_id")?),
        attendee: Principal::new(row.get::<_, String>("attendee")?),
        status,
        confidence,
        updated_at: u64_from_db(row.get("updated_at")?),
    };
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("rsvps row: {err}")))?;
    Ok(record)
}
