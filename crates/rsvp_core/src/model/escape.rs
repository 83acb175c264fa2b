//! Escape hatch domain model.
//!
//! # Responsibility
//! - Define per-(meeting, participant) excuse declarations.
//! - Own the one-way `Declared -> Triggered` transition.
//!
//! # Invariants
//! - `triggered_at.is_some() == triggered`.
//! - `reason` and `declared_at` never change after declaration.
//! - `reason` is at most `ESCAPE_REASON_MAX_CHARS` Unicode scalar values.

use crate::model::identity::{Principal, TimeMark};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum escape reason length in Unicode scalar values.
pub const ESCAPE_REASON_MAX_CHARS: usize = 128;

pub type MeetingId = u64;

/// A pre-declared excuse for skipping or leaving a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapeHatch {
    pub meeting_id: MeetingId,
    pub participant: Principal,
    pub reason: String,
    pub declared_at: TimeMark,
    pub triggered: bool,
    /// Present iff `triggered`.
    pub triggered_at: Option<TimeMark>,
}

/// Projection of a key onto the escape hatch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeState {
    Absent,
    Declared,
    Triggered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeValidationError {
    ReasonTooLong { chars: usize },
    TriggerMismatch { triggered: bool },
}

impl Display for EscapeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReasonTooLong { chars } => write!(
                f,
                "escape reason is {chars} characters; maximum is {ESCAPE_REASON_MAX_CHARS}"
            ),
            Self::TriggerMismatch { triggered } => write!(
                f,
                "escape hatch triggered={triggered} disagrees with triggered_at"
            ),
        }
    }
}

impl Error for EscapeValidationError {}

impl EscapeHatch {
    /// Creates an untriggered declaration.
    pub fn declare(
        meeting_id: MeetingId,
        participant: Principal,
        reason: impl Into<String>,
        declared_at: TimeMark,
    ) -> Self {
        Self {
            meeting_id,
            participant,
            reason: reason.into(),
            declared_at,
            triggered: false,
            triggered_at: None,
        }
    }

    /// Flips to triggered at `now`.
    ///
    /// Returns `false` and leaves the record untouched if already triggered.
    pub fn trigger(&mut self, now: TimeMark) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        self.triggered_at = Some(now);
        true
    }

    /// Declared and not yet used.
    pub fn is_active(&self) -> bool {
        !self.triggered
    }

    pub fn state(&self) -> EscapeState {
        if self.triggered {
            EscapeState::Triggered
        } else {
            EscapeState::Declared
        }
    }

    pub fn validate(&self) -> Result<(), EscapeValidationError> {
        validate_reason(&self.reason)?;
        if self.triggered != self.triggered_at.is_some() {
            return Err(EscapeValidationError::TriggerMismatch {
                triggered: self.triggered,
            });
        }
        Ok(())
    }
}

pub fn validate_reason(reason: &str) -> Result<(), EscapeValidationError> {
    let chars = reason.chars().count();
    if chars > ESCAPE_REASON_MAX_CHARS {
        return Err(EscapeValidationError::ReasonTooLong { chars });
    }
    Ok(())
}
