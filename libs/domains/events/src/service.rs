//! Event service layer

use crate::error::{EventError, Result};
use crate::models::{Event, EventFilter, EventView, NewEvent};
use crate::repository::EventRepository;
use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

/// Queries and registration on top of an [`EventRepository`]
pub struct EventService<R: EventRepository> {
    repository: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// List events matching `filter`, annotated for `filter.user_id`
    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> Result<Vec<EventView>> {
        let events = self.repository.list(&filter).await?;
        let viewer = filter.user_id.as_deref();

        Ok(events
            .into_iter()
            .map(|event| EventView::for_viewer(event, viewer))
            .collect())
    }

    /// Get one event as seen by `user_id`
    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str, user_id: Option<&str>) -> Result<EventView> {
        self.repository
            .get_by_id(id)
            .await?
            .map(|event| EventView::for_viewer(event, user_id))
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }

    /// Register `user_id` for `event_id`.
    ///
    /// Delegates the whole check-and-write to the repository's conditional
    /// update. No retries.
    #[instrument(skip(self))]
    pub async fn register(&self, event_id: &str, user_id: &str) -> Result<Event> {
        match self.repository.register(event_id, user_id, Utc::now()).await {
            Ok(event) => {
                info!(
                    participants = event.participants,
                    attendee_limit = event.attendee_limit,
                    "User registered for event"
                );
                Ok(event)
            }
            Err(e @ EventError::Store(_)) => {
                warn!(error = %e, "Registration failed");
                Err(e)
            }
            Err(e) => {
                info!(reason = %e, "Registration rejected");
                Err(e)
            }
        }
    }

    /// Replace every stored event with `events`.
    ///
    /// All entries are validated before anything is deleted.
    #[instrument(skip(self, events), fields(count = events.len()))]
    pub async fn reset_seed_events(&self, events: Vec<NewEvent>) -> Result<Vec<Event>> {
        for event in &events {
            event.validate()?;
        }

        let created = self.repository.reset(events, Utc::now()).await?;
        info!(count = created.len(), "Seed events loaded");
        Ok(created)
    }
}
