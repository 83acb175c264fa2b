//! Event registration entry points.
//!
//! # Invariants
//! - Event ids are unique for the lifetime of the store.
//! - Registered events are immutable; there is no update path.

use crate::model::event::{validate_title, validate_window, Event, EventId};
use crate::model::identity::{CallContext, TimeMark};
use crate::repo::event_repo::{EventListQuery, EventRepository};
use crate::service::error::{log_rejected, CalendarError, CalendarResult};
use log::info;

/// Registry of calendar events owned by their organizers.
pub struct EventRegistry<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers event `id` with the caller as organizer.
    ///
    /// # Errors
    /// - `InvalidTitle` for non-ASCII or over-long titles.
    /// - `InvalidWindow` when `start_mark >= end_mark`.
    /// - `EventExists` when `id` is already registered.
    pub fn register_event(
        &self,
        ctx: &CallContext,
        id: EventId,
        title: &str,
        start_mark: TimeMark,
        end_mark: TimeMark,
    ) -> CalendarResult<EventId> {
        self.try_register(ctx, id, title, start_mark, end_mark)
            .inspect_err(|err| log_rejected("event", "register_event", err.kind(), err.code()))
    }

    fn try_register(
        &self,
        ctx: &CallContext,
        id: EventId,
        title: &str,
        start_mark: TimeMark,
        end_mark: TimeMark,
    ) -> CalendarResult<EventId> {
        validate_title(title)?;
        validate_window(start_mark, end_mark)?;
        if self.repo.event_exists(id)? {
            return Err(CalendarError::EventExists(id));
        }

        let event = Event {
            id,
            organizer: ctx.caller.clone(),
            start_mark,
            end_mark,
            title: title.to_string(),
        };
        self.repo.insert_event(&event)?;

        info!(
            "event=register_event module=event status=ok event_id={id} at={} duration={}",
            ctx.now,
            event.duration()
        );
        Ok(id)
    }

    pub fn get_event(&self, id: EventId) -> CalendarResult<Option<Event>> {
        Ok(self.repo.get_event(id)?)
    }

    pub fn list_events(&self, query: &EventListQuery) -> CalendarResult<Vec<Event>> {
        Ok(self.repo.list_events(query)?)
    }
}
