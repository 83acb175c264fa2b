//! Calendar event domain model.
//!
//! # Responsibility
//! - Define the immutable event metadata record.
//! - Validate the time window and bounded title before persistence.
//!
//! # Invariants
//! - `start_mark < end_mark` strictly.
//! - `title` is ASCII and at most `EVENT_TITLE_MAX_LEN` bytes.
//! - Events are never updated or deleted once registered.

use crate::model::identity::{Principal, TimeMark};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum event title length in ASCII bytes.
pub const EVENT_TITLE_MAX_LEN: usize = 64;

/// Caller-chosen event identifier, unique for the lifetime of the store.
pub type EventId = u64;

/// Registered event metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Principal that registered the event.
    pub organizer: Principal,
    pub start_mark: TimeMark,
    pub end_mark: TimeMark,
    pub title: String,
}

/// Record-level validation errors for `Event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    InvalidWindow {
        start_mark: TimeMark,
        end_mark: TimeMark,
    },
    TitleTooLong {
        len: usize,
    },
    TitleNotAscii,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow {
                start_mark,
                end_mark,
            } => write!(
                f,
                "invalid event window: start_mark {start_mark} must be before end_mark {end_mark}"
            ),
            Self::TitleTooLong { len } => write!(
                f,
                "event title is {len} bytes; maximum is {EVENT_TITLE_MAX_LEN}"
            ),
            Self::TitleNotAscii => write!(f, "event title must be ASCII"),
        }
    }
}

impl Error for EventValidationError {}

impl Event {
    /// Checks the title bound and the time window.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_title(&self.title)?;
        validate_window(self.start_mark, self.end_mark)
    }

    /// Number of time marks covered by the event window.
    pub fn duration(&self) -> TimeMark {
        self.end_mark - self.start_mark
    }
}

/// Rejects titles outside the bounded ASCII domain.
pub fn validate_title(title: &str) -> Result<(), EventValidationError> {
    if !title.is_ascii() {
        return Err(EventValidationError::TitleNotAscii);
    }
    if title.len() > EVENT_TITLE_MAX_LEN {
        return Err(EventValidationError::TitleTooLong { len: title.len() });
    }
    Ok(())
}

/// Rejects empty or reversed windows.
pub fn validate_window(
    start_mark: TimeMark,
    end_mark: TimeMark,
) -> Result<(), EventValidationError> {
    if start_mark >= end_mark {
        return Err(EventValidationError::InvalidWindow {
            start_mark,
            end_mark,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_title, validate_window, Event, EventValidationError};
    use crate::model::identity::Principal;

    fn event(start_mark: u64, end_mark: u64, title: &str) -> Event {
        Event {
            id: 1,
            organizer: Principal::new("alice"),
            start_mark,
            end_mark,
            title: title.to_string(),
        }
    }

    #[test]
    fn window_must_be_strictly_increasing() {
        assert!(validate_window(10, 11).is_ok());
        assert_eq!(
            validate_window(10, 10),
            Err(EventValidationError::InvalidWindow {
                start_mark: 10,
                end_mark: 10
            })
        );
        assert!(validate_window(11, 10).is_err());
    }

    #[test]
    fn title_accepts_exactly_max_len_and_rejects_longer() {
        assert!(validate_title(&"a".repeat(64)).is_ok());
        assert_eq!(
            validate_title(&"a".repeat(65)),
            Err(EventValidationError::TitleTooLong { len: 65 })
        );
    }

    #[test]
    fn title_rejects_non_ascii() {
        assert_eq!(
            validate_title("café"),
            Err(EventValidationError::TitleNotAscii)
        );
    }

    #[test]
    fn validate_checks_title_before_window() {
        let err = event(5, 1, "caf\u{e9}").validate().unwrap_err();
        assert_eq!(err, EventValidationError::TitleNotAscii);
        assert_eq!(event(1, 5, "standup").duration(), 4);
    }
}
