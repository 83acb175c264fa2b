//! Domain records for the event, RSVP and escape hatch stores.
//!
//! # Responsibility
//! - Define canonical record shapes shared by repositories and services.
//! - Keep record-level invariants next to the data (`validate()`).
//!
//! # Invariants
//! - Records are keyed by their id or composite `(id, principal)` key.
//! - No record references a record in another store.

pub mod escape;
pub mod event;
pub mod identity;
pub mod rsvp;
