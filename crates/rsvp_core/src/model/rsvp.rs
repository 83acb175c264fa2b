//! RSVP domain model.
//!
//! # Responsibility
//! - Define per-(event, attendee) RSVP records and their closed status set.
//! - Fix the confidence rules for definitive responses.
//!
//! # Invariants
//! - `confidence` is always within `0..=MAX_CONFIDENCE`.
//! - `Yes` always carries `MAX_CONFIDENCE`; `No` always carries `0`.
//! - Absence of a record is the "unset" state, not a status variant.

use crate::model::event::EventId;
use crate::model::identity::{Principal, TimeMark};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for attendance confidence (percent).
pub const MAX_CONFIDENCE: u8 = 100;

/// Attendee response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    /// Tentative, with caller-supplied confidence.
    Maybe,
    /// Definitive attendance.
    Yes,
    /// Definitive absence.
    No,
}

impl RsvpStatus {
    /// Stable string id used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Maybe => "maybe",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "maybe" => Some(Self::Maybe),
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    /// Confidence implied by definitive statuses; `None` for `Maybe`.
    pub fn fixed_confidence(self) -> Option<u8> {
        match self {
            Self::Maybe => None,
            Self::Yes => Some(MAX_CONFIDENCE),
            Self::No => Some(0),
        }
    }
}

/// One attendee's response to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpRecord {
    pub event_id: EventId,
    pub attendee: Principal,
    pub status: RsvpStatus,
    /// Attendance likelihood in percent.
    pub confidence: u8,
    /// Host time mark of the latest submission.
    pub updated_at: TimeMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsvpValidationError {
    ConfidenceOutOfRange(u8),
    ConfidenceMismatch { status: RsvpStatus, confidence: u8 },
}

impl Display for RsvpValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfidenceOutOfRange(value) => write!(
                f,
                "confidence {value} is out of range 0..={MAX_CONFIDENCE}"
            ),
            Self::ConfidenceMismatch { status, confidence } => write!(
                f,
                "status `{}` cannot carry confidence {confidence}",
                status.as_str()
            ),
        }
    }
}

impl Error for RsvpValidationError {}

impl RsvpRecord {
    pub fn validate(&self) -> Result<(), RsvpValidationError> {
        validate_confidence(self.confidence)?;
        match self.status.fixed_confidence() {
            Some(expected) if expected != self.confidence => {
                Err(RsvpValidationError::ConfidenceMismatch {
                    status: self.status,
                    confidence: self.confidence,
                })
            }
            _ => Ok(()),
        }
    }
}

pub fn validate_confidence(confidence: u8) -> Result<(), RsvpValidationError> {
    if confidence > MAX_CONFIDENCE {
        return Err(RsvpValidationError::ConfidenceOutOfRange(confidence));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RsvpRecord, RsvpStatus, RsvpValidationError};
    use crate::model::identity::Principal;

    fn record(status: RsvpStatus, confidence: u8) -> RsvpRecord {
        RsvpRecord {
            event_id: 7,
            attendee: Principal::new("bob"),
            status,
            confidence,
            updated_at: 3,
        }
    }

    #[test]
    fn status_string_ids_are_stable() {
        for status in [RsvpStatus::Maybe, RsvpStatus::Yes, RsvpStatus::No] {
            assert_eq!(RsvpStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RsvpStatus::parse("perhaps"), None);
    }

    #[test]
    fn definitive_statuses_pin_confidence() {
        assert!(record(RsvpStatus::Yes, 100).validate().is_ok());
        assert!(record(RsvpStatus::No, 0).validate().is_ok());
        assert!(matches!(
            record(RsvpStatus::Yes, 90).validate(),
            Err(RsvpValidationError::ConfidenceMismatch { .. })
        ));
    }

    #[test]
    fn maybe_accepts_any_in_range_confidence() {
        assert!(record(RsvpStatus::Maybe, 0).validate().is_ok());
        assert!(record(RsvpStatus::Maybe, 100).validate().is_ok());
        assert_eq!(
            record(RsvpStatus::Maybe, 101).validate(),
            Err(RsvpValidationError::ConfidenceOutOfRange(101))
        );
    }
}
