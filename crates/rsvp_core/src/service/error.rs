//! Error taxonomy for the ledger entry points.
//!
//! # Invariants
//! - Every failing entry point returns before any write.
//! - Numeric codes are closed and distinct per store; storage failures
//!   share `STORAGE_ERROR_CODE`.

use crate::model::escape::{EscapeValidationError, MeetingId};
use crate::model::event::{EventId, EventValidationError};
use crate::model::identity::{Principal, TimeMark};
use crate::repo::RepoError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const STORAGE_ERROR_CODE: u32 = 500;

/// Coarse error category shared by both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input outside the accepted domain.
    Validation,
    /// Required record absent.
    NotFound,
    /// Record already present at the target key.
    Conflict,
    /// Host storage failure; not part of the ledger contract.
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Errors from the event registry and the RSVP ledger.
#[derive(Debug)]
pub enum CalendarError {
    InvalidWindow {
        start_mark: TimeMark,
        end_mark: TimeMark,
    },
    InvalidTitle(EventValidationError),
    EventExists(EventId),
    EventNotFound(EventId),
    /// No RSVP recorded for the key; distinct from a zero confidence.
    RsvpNotFound {
        event_id: EventId,
        attendee: Principal,
    },
    ConfidenceOutOfRange(u8),
    Repo(RepoError),
}

impl CalendarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWindow { .. } | Self::InvalidTitle(_) | Self::ConfidenceOutOfRange(_) => {
                ErrorKind::Validation
            }
            Self::EventNotFound(_) | Self::RsvpNotFound { .. } => ErrorKind::NotFound,
            Self::EventExists(_) => ErrorKind::Conflict,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidWindow { .. } => 100,
            Self::EventExists(_) => 101,
            Self::EventNotFound(_) | Self::RsvpNotFound { .. } => 102,
            Self::ConfidenceOutOfRange(_) => 103,
            Self::InvalidTitle(_) => 104,
            Self::Repo(_) => STORAGE_ERROR_CODE,
        }
    }
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow {
                start_mark,
                end_mark,
            } => write!(
                f,
                "invalid event window: start_mark {start_mark} must be before end_mark {end_mark}"
            ),
            Self::InvalidTitle(err) => write!(f, "{err}"),
            Self::EventExists(id) => write!(f, "event already exists: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::RsvpNotFound { event_id, attendee } => {
                write!(f, "no rsvp for event {event_id} by {attendee}")
            }
            Self::ConfidenceOutOfRange(value) => {
                write!(f, "confidence {value} is out of range 0..=100")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CalendarError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<EventValidationError> for CalendarError {
    fn from(value: EventValidationError) -> Self {
        match value {
            EventValidationError::InvalidWindow {
                start_mark,
                end_mark,
            } => Self::InvalidWindow {
                start_mark,
                end_mark,
            },
            other => Self::InvalidTitle(other),
        }
    }
}

pub type EscapeResult<T> = Result<T, EscapeError>;

/// Errors from the escape hatch ledger.
#[derive(Debug)]
pub enum EscapeError {
    EscapeAlreadyRegistered {
        meeting_id: MeetingId,
        participant: Principal,
    },
    EscapeNotFound {
        meeting_id: MeetingId,
        participant: Principal,
    },
    InvalidReason(EscapeValidationError),
    Repo(RepoError),
}

impl EscapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EscapeAlreadyRegistered { .. } => ErrorKind::Conflict,
            Self::EscapeNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidReason(_) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::EscapeAlreadyRegistered { .. } => 200,
            Self::EscapeNotFound { .. } => 201,
            Self::InvalidReason(_) => 202,
            Self::Repo(_) => STORAGE_ERROR_CODE,
        }
    }
}

impl Display for EscapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EscapeAlreadyRegistered {
                meeting_id,
                participant,
            } => write!(
                f,
                "escape hatch already registered for meeting {meeting_id} by {participant}"
            ),
            Self::EscapeNotFound {
                meeting_id,
                participant,
            } => write!(
                f,
                "no escape hatch for meeting {meeting_id} by {participant}"
            ),
            Self::InvalidReason(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EscapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReason(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EscapeError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub(crate) fn log_rejected(module: &str, op: &str, kind: ErrorKind, code: u32) {
    debug!(
        "event={op} module={module} status=rejected error_kind={} error_code={code}",
        kind.as_str()
    );
}
