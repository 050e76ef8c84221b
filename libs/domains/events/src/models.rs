//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Publication state of an event
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventStatus {
    Draft,
    #[default]
    Published,
    Cancelled,
    Completed,
}

/// Where the event takes place
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventFormat {
    #[default]
    Online,
    InPerson,
    Hybrid,
}

/// Instructor running the event, embedded in the event document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub avatar: Option<String>,
}

/// Event document as stored in the `events` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Assigned by the store on insert
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Local start time, `HH:MM`
    pub time: String,
    pub format: EventFormat,
    pub location: String,
    pub attendee_limit: u32,
    /// Distinct user ids
    #[serde(default)]
    pub registered_users: Vec<String>,
    /// Always equal to `registered_users.len()`
    #[serde(default)]
    pub participants: u32,
    pub status: EventStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub instructor: Instructor,
    /// Registration happens on this external page instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    /// Only disclosed to registered users
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Materializes a seed entry with a store-assigned id and no registrations.
    pub fn from_new(input: NewEvent, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            date: input.date,
            time: input.time,
            format: input.format,
            location: input.location,
            attendee_limit: input.attendee_limit,
            registered_users: Vec::new(),
            participants: 0,
            status: input.status,
            tags: input.tags,
            instructor: input.instructor,
            external_link: input.external_link,
            meeting_link: input.meeting_link,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_registered(&self, user_id: &str) -> bool {
        self.registered_users.iter().any(|u| u == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.registered_users.len() >= self.attendee_limit as usize
    }

    pub fn spots_left(&self) -> u32 {
        self.attendee_limit
            .saturating_sub(self.registered_users.len() as u32)
    }
}

/// Seed input for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    pub date: NaiveDate,
    #[validate(custom(function = "validate_time"))]
    pub time: String,
    #[serde(default)]
    pub format: EventFormat,
    #[serde(default)]
    pub location: String,
    #[validate(range(min = 1))]
    pub attendee_limit: u32,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(nested)]
    pub instructor: Instructor,
    #[serde(default)]
    #[validate(url)]
    pub external_link: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub meeting_link: Option<String>,
}

fn validate_time(time: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new("time_format"))
}

/// Authenticated user, as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Query filters for listing events. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub instructor_id: Option<String>,
    /// Matches when the event carries any of these tags
    pub tags: Vec<String>,
    /// Viewer for `isRegistered`; never restricts results
    pub user_id: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if self.status.is_some_and(|status| status != event.status) {
            return false;
        }
        if self
            .instructor_id
            .as_deref()
            .is_some_and(|id| id != event.instructor.id)
        {
            return false;
        }
        self.tags.is_empty() || self.tags.iter().any(|tag| event.tags.contains(tag))
    }
}

/// Event as returned to a particular viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub format: EventFormat,
    pub location: String,
    pub attendee_limit: u32,
    pub participants: u32,
    pub spots_left: u32,
    pub status: EventStatus,
    pub tags: Vec<String>,
    pub instructor: Instructor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    /// Present only when the viewer is registered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub is_registered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventView {
    pub fn for_viewer(event: Event, user_id: Option<&str>) -> Self {
        let is_registered = user_id.is_some_and(|id| event.is_registered(id));
        let spots_left = event.spots_left();

        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            format: event.format,
            location: event.location,
            attendee_limit: event.attendee_limit,
            participants: event.participants,
            spots_left,
            status: event.status,
            tags: event.tags,
            instructor: event.instructor,
            external_link: event.external_link,
            meeting_link: event.meeting_link.filter(|_| is_registered),
            is_registered,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn instructor(id: &str) -> Instructor {
        Instructor {
            id: id.to_string(),
            name: "Grace Hopper".to_string(),
            title: "Staff Engineer".to_string(),
            bio: "Compilers and COBOL".to_string(),
            avatar: None,
        }
    }

    pub fn new_event(title: &str, attendee_limit: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "Hands-on session".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 14).unwrap(),
            time: "18:30".to_string(),
            format: EventFormat::Online,
            location: "Zoom".to_string(),
            attendee_limit,
            status: EventStatus::Published,
            tags: vec!["rust".to_string()],
            instructor: instructor("inst-1"),
            external_link: None,
            meeting_link: Some("https://meet.example.com/abc".to_string()),
        }
    }

    pub fn event(id: &str, attendee_limit: u32) -> Event {
        Event::from_new(new_event(id, attendee_limit), id.to_string(), Utc::now())
    }
}
