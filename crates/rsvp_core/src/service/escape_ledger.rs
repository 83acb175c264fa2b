//! Escape hatch entry points.
//!
//! # Invariants
//! - One declaration per `(meeting_id, participant)` until cleared.
//! - Triggering an already-triggered hatch returns `Ok(false)` and writes
//!   nothing.
//! - Clearing frees the key for a fresh declaration.

use crate::model::escape::{validate_reason, EscapeHatch, EscapeState, MeetingId};
use crate::model::identity::{CallContext, Principal};
use crate::repo::escape_repo::EscapeRepository;
use crate::service::error::{log_rejected, EscapeError, EscapeResult};
use log::info;

pub struct EscapeHatchLedger<R: EscapeRepository> {
    repo: R,
}

impl<R: EscapeRepository> EscapeHatchLedger<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Declares an untriggered escape hatch for the caller.
    ///
    /// # Errors
    /// - `InvalidReason` when `reason` exceeds 128 characters.
    /// - `EscapeAlreadyRegistered` when the caller already holds one for
    ///   `meeting_id`.
    pub fn declare_escape(
        &self,
        ctx: &CallContext,
        meeting_id: MeetingId,
        reason: &str,
    ) -> EscapeResult<()> {
        self.try_declare(ctx, meeting_id, reason)
            .inspect_err(|err| log_rejected("escape", "declare_escape", err.kind(), err.code()))
    }

    fn try_declare(
        &self,
        ctx: &CallContext,
        meeting_id: MeetingId,
        reason: &str,
    ) -> EscapeResult<()> {
        validate_reason(reason).map_err(EscapeError::InvalidReason)?;
        if self.repo.get_escape(meeting_id, &ctx.caller)?.is_some() {
            return Err(EscapeError::EscapeAlreadyRegistered {
                meeting_id,
                participant: ctx.caller.clone(),
            });
        }

        let hatch = EscapeHatch::declare(meeting_id, ctx.caller.clone(), reason, ctx.now);
        self.repo.insert_escape(&hatch)?;

        // Reason text is user content and stays out of logs.
        info!(
            "event=declare_escape module=escape status=ok meeting_id={meeting_id} at={}",
            ctx.now
        );
        Ok(())
    }

    /// Uses the caller's escape hatch.
    ///
    /// Returns `true` on the `Declared -> Triggered` transition and `false`
    /// when it was already triggered.
    pub fn trigger_escape(&self, ctx: &CallContext, meeting_id: MeetingId) -> EscapeResult<bool> {
        self.try_trigger(ctx, meeting_id)
            .inspect_err(|err| log_rejected("escape", "trigger_escape", err.kind(), err.code()))
    }

    fn try_trigger(&self, ctx: &CallContext, meeting_id: MeetingId) -> EscapeResult<bool> {
        let mut hatch = self
            .repo
            .get_escape(meeting_id, &ctx.caller)?
            .ok_or_else(|| EscapeError::EscapeNotFound {
                meeting_id,
                participant: ctx.caller.clone(),
            })?;

        if !hatch.trigger(ctx.now) {
            info!(
                "event=trigger_escape module=escape status=noop meeting_id={meeting_id} at={}",
                ctx.now
            );
            return Ok(false);
        }

        let changed = self.repo.mark_triggered(meeting_id, &ctx.caller, ctx.now)?;
        info!(
            "event=trigger_escape module=escape status=ok meeting_id={meeting_id} changed={changed} at={}",
            ctx.now
        );
        Ok(changed)
    }

    /// Deletes the caller's escape hatch in any state.
    pub fn clear_escape(&self, ctx: &CallContext, meeting_id: MeetingId) -> EscapeResult<()> {
        self.try_clear(ctx, meeting_id)
            .inspect_err(|err| log_rejected("escape", "clear_escape", err.kind(), err.code()))
    }

    fn try_clear(&self, ctx: &CallContext, meeting_id: MeetingId) -> EscapeResult<()> {
        if !self.repo.delete_escape(meeting_id, &ctx.caller)? {
            return Err(EscapeError::EscapeNotFound {
                meeting_id,
                participant: ctx.caller.clone(),
            });
        }
        info!(
            "event=clear_escape module=escape status=ok meeting_id={meeting_id} at={}",
            ctx.now
        );
        Ok(())
    }

    pub fn get_escape(
        &self,
        meeting_id: MeetingId,
        who: &Principal,
    ) -> EscapeResult<Option<EscapeHatch>> {
        Ok(self.repo.get_escape(meeting_id, who)?)
    }

    /// True only between declaration and trigger/clear.
    pub fn has_active_escape(&self, meeting_id: MeetingId, who: &Principal) -> EscapeResult<bool> {
        Ok(self
            .repo
            .get_escape(meeting_id, who)?
            .is_some_and(|hatch| hatch.is_active()))
    }

    pub fn escape_state(
        &self,
        meeting_id: MeetingId,
        who: &Principal,
    ) -> EscapeResult<EscapeState> {
        Ok(self
            .repo
            .get_escape(meeting_id, who)?
            .map_or(EscapeState::Absent, |hatch| hatch.state()))
    }

    pub fn list_escapes(&self, meeting_id: MeetingId) -> EscapeResult<Vec<EscapeHatch>> {
        Ok(self.repo.list_escapes(meeting_id)?)
    }
}
