//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Event, EventFilter, NewEvent};
use crate::repository::EventRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId, to_bson};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};
use tracing::{debug, info, instrument};

pub const EVENTS_COLLECTION: &str = "events";

#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(EVENTS_COLLECTION),
        }
    }

    pub async fn create_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "date": 1, "time": 1 })
                .build(),
            IndexModel::builder().keys(doc! { "status": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "instructor.id": 1 })
                .build(),
            IndexModel::builder().keys(doc! { "tags": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        info!("Event indexes created");
        Ok(())
    }

    fn build_filter(filter: &EventFilter) -> Document {
        let mut doc = Document::new();

        if let Some(status) = &filter.status {
            doc.insert("status", status.to_string());
        }

        if let Some(instructor_id) = &filter.instructor_id {
            doc.insert("instructor.id", instructor_id);
        }

        if !filter.tags.is_empty() {
            doc.insert("tags", doc! { "$in": filter.tags.clone() });
        }

        doc
    }

    /// Matches only when the user can still be added: not yet registered
    /// and fewer attendees than the limit.
    fn registration_guard(event_id: &str, user_id: &str) -> Document {
        doc! {
            "_id": event_id,
            "registeredUsers": { "$ne": user_id },
            "$expr": {
                "$lt": [ { "$size": "$registeredUsers" }, "$attendeeLimit" ]
            },
        }
    }

    fn registration_update(user_id: &str, at: DateTime<Utc>) -> Result<Document> {
        Ok(doc! {
            "$addToSet": { "registeredUsers": user_id },
            "$inc": { "participants": 1 },
            "$set": { "updatedAt": to_bson(&at)? },
        })
    }

    /// Explains why the guarded update matched nothing. Read-only.
    async fn classify_rejection(&self, event_id: &str, user_id: &str) -> EventError {
        match self.collection.find_one(doc! { "_id": event_id }).await {
            Ok(None) => EventError::NotFound(event_id.to_string()),
            Ok(Some(event)) if event.is_registered(user_id) => EventError::AlreadyRegistered {
                event_id: event_id.to_string(),
                user_id: user_id.to_string(),
            },
            Ok(Some(event)) if event.is_full() => EventError::EventFull {
                event_id: event_id.to_string(),
                attendee_limit: event.attendee_limit,
            },
            Ok(Some(_)) => {
                EventError::Store("registration was not applied and the event changed".to_string())
            }
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events: Vec<Event> = self
            .collection
            .find(Self::build_filter(filter))
            .sort(doc! { "date": 1, "time": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;

        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self, at))]
    async fn register(&self, event_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<Event> {
        let updated = self
            .collection
            .find_one_and_update(
                Self::registration_guard(event_id, user_id),
                Self::registration_update(user_id, at)?,
            )
            .return_document(ReturnDocument::After)
            .await?;

        match updated {
            Some(event) => Ok(event),
            None => Err(self.classify_rejection(event_id, user_id).await),
        }
    }

    #[instrument(skip(self, events), fields(count = events.len()))]
    async fn reset(&self, events: Vec<NewEvent>, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let deleted = self.collection.delete_many(doc! {}).await?;
        info!(deleted = deleted.deleted_count, "Cleared events collection");

        let events: Vec<Event> = events
            .into_iter()
            .map(|input| Event::from_new(input, ObjectId::new().to_hex(), now))
            .collect();

        if !events.is_empty() {
            self.collection.insert_many(&events).await?;
        }

        info!(inserted = events.len(), "Inserted seed events");
        Ok(events)
    }
}
