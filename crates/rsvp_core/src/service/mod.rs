//! Ledger entry points.
//!
//! # Responsibility
//! - Evaluate every guard before the single write of each call.
//! - Keep callers decoupled from SQL and row layout.
//!
//! # Invariants
//! - No entry point touches both the calendar and escape hatch stores.
//! - Rejected calls leave state unchanged.

pub mod error;
pub mod escape_ledger;
pub mod event_registry;
pub mod rsvp_ledger;
