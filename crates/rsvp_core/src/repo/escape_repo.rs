//! Escape hatch ledger persistence.
//!
//! # Invariants
//! - At most one row per `(meeting_id, participant)`.
//! - `mark_triggered` only touches untriggered rows and never rewrites
//!   `reason` or `declared_at`.

use crate::model::escape::{EscapeHatch, MeetingId};
use crate::model::identity::{Principal, TimeMark};
use crate::repo::{
    bool_to_int, ensure_table_ready, int_to_bool, u64_from_db, u64_to_db, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const ESCAPE_SELECT_SQL: &str = "SELECT
    meeting_id,
    participant,
    reason,
    declared_at,
    triggered,
    triggered_at
FROM escape_hatches";

pub trait EscapeRepository {
    fn insert_escape(&self, hatch: &EscapeHatch) -> RepoResult<()>;
    fn get_escape(
        &self,
        meeting_id: MeetingId,
        participant: &Principal,
    ) -> RepoResult<Option<EscapeHatch>>;
    /// Sets the trigger fields on an untriggered row.
    ///
    /// Returns `false` when no untriggered row matched.
    fn mark_triggered(
        &self,
        meeting_id: MeetingId,
        participant: &Principal,
        at: TimeMark,
    ) -> RepoResult<bool>;
    /// Returns whether a row was removed.
    fn delete_escape(&self, meeting_id: MeetingId, participant: &Principal) -> RepoResult<bool>;
    /// Lists every record for one meeting, ordered by participant.
    fn list_escapes(&self, meeting_id: MeetingId) -> RepoResult<Vec<EscapeHatch>>;
}

/// SQLite-backed escape hatch ledger.
pub struct SqliteEscapeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEscapeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "escape_hatches",
            &[
                "meeting_id",
                "participant",
                "reason",
                "declared_at",
                "triggered",
                "triggered_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl EscapeRepository for SqliteEscapeRepository<'_> {
    fn insert_escape(&self, hatch: &EscapeHatch) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO escape_hatches (
                meeting_id,
                participant,
                reason,
                declared_at,
                triggered,
                triggered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                u64_to_db(hatch.meeting_id),
                hatch.participant.as_str(),
                hatch.reason.as_str(),
                u64_to_db(hatch.declared_at),
                bool_to_int(hatch.triggered),
                hatch.triggered_at.map(u64_to_db),
            ],
        )?;
        Ok(())
    }

    fn get_escape(
        &self,
        meeting_id: MeetingId,
        participant: &Principal,
    ) -> RepoResult<Option<EscapeHatch>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ESCAPE_SELECT_SQL} WHERE meeting_id = ?1 AND participant = ?2;"
        ))?;
        let mut rows = stmt.query(params![u64_to_db(meeting_id), participant.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_escape_row(row)?)),
            None => Ok(None),
        }
    }

    fn mark_triggered(
        &self,
        meeting_id: MeetingId,
        participant: &Principal,
        at: TimeMark,
    ) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE escape_hatches
             SET
                triggered = 1,
                triggered_at = ?3
             WHERE meeting_id = ?1
               AND participant = ?2
               AND triggered = 0;",
            params![u64_to_db(meeting_id), participant.as_str(), u64_to_db(at)],
        )?;
        Ok(changed > 0)
    }

    fn delete_escape(&self, meeting_id: MeetingId, participant: &Principal) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM escape_hatches WHERE meeting_id = ?1 AND participant = ?2;",
            params![u64_to_db(meeting_id), participant.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn list_escapes(&self, meeting_id: MeetingId) -> RepoResult<Vec<EscapeHatch>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ESCAPE_SELECT_SQL} WHERE meeting_id = ?1 ORDER BY participant ASC;"
        ))?;
        let mut rows = stmt.query([u64_to_db(meeting_id)])?;
        let mut hatches = Vec::new();
        while let Some(row) = rows.next()? {
            hatches.push(parse_escape_row(row)?);
        }
        Ok(hatches)
    }
}

fn parse_escape_row(row: &Row<'_>) -> RepoResult<EscapeHatch> {
    let hatch = EscapeHatch {
        meeting_id: u64_from_db(row.get("meeting_id")?),
        participant: Principal::new(row.get::<_, String>("participant")?),
        reason: row.get("reason")?,
        declared_at: u64_from_db(row.get("declared_at")?),
        triggered: int_to_bool(row.get("triggered")?, "escape_hatches.triggered")?,
        triggered_at: row.get::<_, Option<i64>>("triggered_at")?.map(u64_from_db),
    };
    hatch
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("escape_hatches row: {err}")))?;
    Ok(hatch)
}
