//! In-memory EventRepository for tests and local runs without MongoDB

use crate::error::{EventError, Result};
use crate::models::{Event, EventFilter, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Events held in a map behind one lock. Registration checks and writes
/// under a single write guard, so it is atomic per event like the Mongo
/// conditional update.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<String, Event>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryEventRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated with `events`, keeping their ids.
    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let map = events.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self {
            events: Arc::new(RwLock::new(map)),
            writes: Arc::default(),
        }
    }

    /// Number of successful registration writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| {
        (a.date, &a.time, &a.id).cmp(&(b.date, &b.time, &b.id))
    });
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut matching: Vec<Event> = events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_events(&mut matching);
        Ok(matching)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn register(&self, event_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<Event> {
        let mut events = self.events.write().await;
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| EventError::NotFound(event_id.to_string()))?;

        if event.is_registered(user_id) {
            return Err(EventError::AlreadyRegistered {
                event_id: event_id.to_string(),
                user_id: user_id.to_string(),
            });
        }
        if event.is_full() {
            return Err(EventError::EventFull {
                event_id: event_id.to_string(),
                attendee_limit: event.attendee_limit,
            });
        }

        event.registered_users.push(user_id.to_string());
        event.participants += 1;
        event.updated_at = at;
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(event.clone())
    }

    async fn reset(&self, events: Vec<NewEvent>, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let created: Vec<Event> = events
            .into_iter()
            .map(|input| Event::from_new(input, ObjectId::new().to_hex(), now))
            .collect();

        let mut store = self.events.write().await;
        store.clear();
        store.extend(created.iter().map(|e| (e.id.clone(), e.clone())));

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{event, new_event};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_register_rejections_do_not_write() {
        let repo = InMemoryEventRepository::with_events([event("evt-1", 1)]);

        let updated = repo.register("evt-1", "u1", Utc::now()).await.unwrap();
        assert_eq!(updated.registered_users, vec!["u1".to_string()]);
        assert_eq!(updated.participants, 1);

        let again = repo.register("evt-1", "u1", Utc::now()).await.unwrap_err();
        assert!(matches!(again, EventError::AlreadyRegistered { .. }));

        let full = repo.register("evt-1", "u2", Utc::now()).await.unwrap_err();
        assert!(matches!(full, EventError::EventFull { attendee_limit: 1, .. }));

        let missing = repo.register("nope", "u1", Utc::now()).await.unwrap_err();
        assert_eq!(missing, EventError::NotFound("nope".into()));

        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_time() {
        let mut late = event("b", 5);
        late.date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let mut early_evening = event("c", 5);
        early_evening.time = "19:00".into();
        let early_morning = {
            let mut e = event("a", 5);
            e.time = "09:00".into();
            e
        };

        let repo = InMemoryEventRepository::with_events([late, early_evening, early_morning]);
        let ids: Vec<String> = repo
            .list(&EventFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_reset_replaces_everything() {
        let mut stale = event("stale", 2);
        stale.registered_users.push("u1".into());
        let repo = InMemoryEventRepository::with_events([stale]);

        let created = repo
            .reset(vec![new_event("Fresh", 3)], Utc::now())
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id.len(), 24);
        assert!(repo.get_by_id("stale").await.unwrap().is_none());

        let all = repo.list(&EventFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].registered_users.is_empty());
        assert_eq!(all[0].participants, 0);
    }
}
