//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; every setting has a default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "RSVP_LEDGER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "RSVP_LEDGER_LOG_LEVEL";
pub const DEFAULT_DB_FILE_NAME: &str = "rsvp_ledger.sqlite3";

/// Ledger database location: `RSVP_LEDGER_DB_PATH`, else the temp dir.
pub fn resolve_db_path() -> PathBuf {
    db_path_from(std::env::var(DB_PATH_ENV).ok())
}

/// Log level: `RSVP_LEDGER_LOG_LEVEL`, else the build-mode default.
///
/// The value is not validated here; `init_logging` rejects unknown levels.
pub fn resolve_log_level() -> String {
    non_blank(std::env::var(LOG_LEVEL_ENV).ok()).unwrap_or_else(|| default_log_level().to_string())
}

fn db_path_from(raw: Option<String>) -> PathBuf {
    non_blank(raw)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
