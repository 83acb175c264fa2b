//! Ledger core for calendar RSVPs and meeting escape hatches.
//! This crate is the single source of truth for both stores' invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::escape::{EscapeHatch, EscapeState, MeetingId, ESCAPE_REASON_MAX_CHARS};
pub use model::event::{Event, EventId, EVENT_TITLE_MAX_LEN};
pub use model::identity::{CallContext, Principal, TimeMark};
pub use model::rsvp::{RsvpRecord, RsvpStatus, MAX_CONFIDENCE};
pub use repo::escape_repo::{EscapeRepository, SqliteEscapeRepository};
pub use repo::event_repo::{EventListQuery, EventRepository, SqliteEventRepository};
pub use repo::rsvp_repo::{RsvpRepository, SqliteRsvpRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::{CalendarError, CalendarResult, ErrorKind, EscapeError, EscapeResult};
pub use service::escape_ledger::EscapeHatchLedger;
pub use service::event_registry::EventRegistry;
pub use service::rsvp_ledger::{RsvpLedger, RsvpSummary};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
