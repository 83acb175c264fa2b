//! Repository contracts and SQLite implementations for the ledger stores.
//!
//! # Responsibility
//! - Keep SQL details inside the persistence boundary.
//! - Map rows to validated domain records and back.
//!
//! # Invariants
//! - Repositories do not enforce business guards; services do.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `u64` ids and time marks are stored bit-cast into signed INTEGER.

use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod escape_repo;
pub mod event_repo;
pub mod rsvp_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error shared by all ledger repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted ledger data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "ledger schema not ready: missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "ledger schema not ready: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Checks that `table` exists with every listed column.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;

    if existing.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }
    for &column in columns {
        if !existing.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

// SQLite INTEGER is i64; two's-complement casts keep the full u64 domain.
pub(crate) fn u64_to_db(value: u64) -> i64 {
    value as i64
}

pub(crate) fn u64_from_db(value: i64) -> u64 {
    value as u64
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
