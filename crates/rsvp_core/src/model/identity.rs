//! Host-supplied call identity and logical time.
//!
//! # Responsibility
//! - Carry the authenticated caller and current time mark into every
//!   mutating entry point.
//!
//! # Invariants
//! - `Principal` is opaque: core compares and stores it, never parses it.
//! - `TimeMark` values come from the host; core never generates them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Monotonic logical time counter supplied by the host (block height).
pub type TimeMark = u64;

/// Opaque authenticated caller identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Per-call context handed in by the hosting ledger.
///
/// One context corresponds to one atomic entry-point invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated principal of the current call.
    pub caller: Principal,
    /// Host time mark at which the call executes.
    pub now: TimeMark,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, now: TimeMark) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }
}
