//! RSVP submission and query entry points.
//!
//! # Responsibility
//! - Route every submission through one guarded upsert path.
//! - Expose per-event read projections (records, tally).
//!
//! # Invariants
//! - Submissions require the event to exist at call time.
//! - `Yes` stores confidence 100, `No` stores 0, `Maybe` stores the
//!   caller-supplied value after range validation.
//! - Cancellation of a missing record succeeds once the event exists.

use crate::model::event::EventId;
use crate::model::identity::{CallContext, Principal};
use crate::model::rsvp::{validate_confidence, RsvpRecord, RsvpStatus, MAX_CONFIDENCE};
use crate::repo::event_repo::EventRepository;
use crate::repo::rsvp_repo::RsvpRepository;
use crate::service::error::{log_rejected, CalendarError, CalendarResult};
use log::info;

/// Per-event response tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpSummary {
    pub event_id: EventId,
    pub maybe: u32,
    pub yes: u32,
    pub no: u32,
    /// Sum of stored confidences across all records.
    pub confidence_total: u64,
}

impl RsvpSummary {
    /// Number of attendees with any recorded response.
    pub fn responded(&self) -> u32 {
        self.maybe + self.yes + self.no
    }

    /// Probabilistic headcount: each record counts `confidence / 100`.
    pub fn expected_attendance(&self) -> f64 {
        self.confidence_total as f64 / f64::from(MAX_CONFIDENCE)
    }
}

/// RSVP ledger validated against an event registry.
pub struct RsvpLedger<E: EventRepository, R: RsvpRepository> {
    events: E,
    rsvps: R,
}

impl<E: EventRepository, R: RsvpRepository> RsvpLedger<E, R> {
    pub fn new(events: E, rsvps: R) -> Self {
        Self { events, rsvps }
    }

    /// Records a tentative response with explicit confidence (0..=100).
    pub fn rsvp_maybe(
        &self,
        ctx: &CallContext,
        event_id: EventId,
        confidence: u8,
    ) -> CalendarResult<()> {
        self.set_rsvp(ctx, event_id, RsvpStatus::Maybe, confidence)
            .inspect_err(|err| log_rejected("rsvp", "rsvp_maybe", err.kind(), err.code()))
    }

    pub fn rsvp_yes(&self, ctx: &CallContext, event_id: EventId) -> CalendarResult<()> {
        self.set_rsvp(ctx, event_id, RsvpStatus::Yes, MAX_CONFIDENCE)
            .inspect_err(|err| log_rejected("rsvp", "rsvp_yes", err.kind(), err.code()))
    }

    pub fn rsvp_no(&self, ctx: &CallContext, event_id: EventId) -> CalendarResult<()> {
        self.set_rsvp(ctx, event_id, RsvpStatus::No, 0)
            .inspect_err(|err| log_rejected("rsvp", "rsvp_no", err.kind(), err.code()))
    }

    /// Removes the caller's response, if any.
    ///
    /// # Errors
    /// - `EventNotFound` when the event is absent.
    pub fn cancel_rsvp(&self, ctx: &CallContext, event_id: EventId) -> CalendarResult<()> {
        self.try_cancel(ctx, event_id)
            .inspect_err(|err| log_rejected("rsvp", "cancel_rsvp", err.kind(), err.code()))
    }

    fn try_cancel(&self, ctx: &CallContext, event_id: EventId) -> CalendarResult<()> {
        self.require_event(event_id)?;
        let removed = self.rsvps.delete_rsvp(event_id, &ctx.caller)?;
        info!(
            "event=cancel_rsvp module=rsvp status=ok event_id={event_id} removed={removed} at={}",
            ctx.now
        );
        Ok(())
    }

    pub fn get_rsvp(
        &self,
        event_id: EventId,
        who: &Principal,
    ) -> CalendarResult<Option<RsvpRecord>> {
        Ok(self.rsvps.get_rsvp(event_id, who)?)
    }

    /// Returns the stored confidence for `who`.
    ///
    /// # Errors
    /// - `RsvpNotFound` when no response is recorded, so "no opinion" is
    ///   never confused with a `No` response's zero.
    pub fn get_confidence(&self, event_id: EventId, who: &Principal) -> CalendarResult<u8> {
        self.rsvps
            .get_rsvp(event_id, who)?
            .map(|record| record.confidence)
            .ok_or_else(|| CalendarError::RsvpNotFound {
                event_id,
                attendee: who.clone(),
            })
    }

    pub fn list_rsvps(&self, event_id: EventId) -> CalendarResult<Vec<RsvpRecord>> {
        self.require_event(event_id)?;
        Ok(self.rsvps.list_rsvps(event_id)?)
    }

    pub fn summarize(&self, event_id: EventId) -> CalendarResult<RsvpSummary> {
        let records = self.list_rsvps(event_id)?;
        let mut summary = RsvpSummary {
            event_id,
            ..RsvpSummary::default()
        };
        for record in &records {
            match record.status {
                RsvpStatus::Maybe => summary.maybe += 1,
                RsvpStatus::Yes => summary.yes += 1,
                RsvpStatus::No => summary.no += 1,
            }
            summary.confidence_total += u64::from(record.confidence);
        }
        Ok(summary)
    }

    /// Single mutation path shared by all submission entry points.
    fn set_rsvp(
        &self,
        ctx: &CallContext,
        event_id: EventId,
        status: RsvpStatus,
        confidence: u8,
    ) -> CalendarResult<()> {
        self.require_event(event_id)?;
        validate_confidence(confidence)
            .map_err(|_| CalendarError::ConfidenceOutOfRange(confidence))?;

        let record = RsvpRecord {
            event_id,
            attendee: ctx.caller.clone(),
            status,
            confidence,
            updated_at: ctx.now,
        };
        self.rsvps.upsert_rsvp(&record)?;

        info!(
            "event=set_rsvp module=rsvp status=ok event_id={event_id} response={} confidence={confidence} at={}",
            status.as_str(),
            ctx.now
        );
        Ok(())
    }

    fn require_event(&self, event_id: EventId) -> CalendarResult<()> {
        if !self.events.event_exists(event_id)? {
            return Err(CalendarError::EventNotFound(event_id));
        }
        Ok(())
    }
}
