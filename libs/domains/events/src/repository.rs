use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Event, EventFilter, NewEvent};

/// Data access for events.
///
/// Implementations must apply [`EventRepository::register`] as one atomic
/// conditional write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events matching `filter`, ordered by date, time, then id
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Event>>;

    /// Adds `user_id` to the attendee list if the event exists, the user is
    /// not yet registered and a seat is free, in one atomic update that also
    /// increments `participants` and stamps `updated_at`.
    ///
    /// Returns the updated event, or `NotFound`, `AlreadyRegistered` or
    /// `EventFull` without writing anything.
    async fn register(&self, event_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<Event>;

    /// Deletes every event, then inserts `events` with fresh ids.
    ///
    /// Not atomic across the two steps.
    async fn reset(&self, events: Vec<NewEvent>, now: DateTime<Utc>) -> Result<Vec<Event>>;
}
