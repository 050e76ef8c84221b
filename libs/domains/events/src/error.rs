//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EventError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Expected outcome of a duplicate attempt, not a failure of the store
    #[error("User {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: String, user_id: String },

    #[error("Event {event_id} is full ({attendee_limit} attendees)")]
    EventFull {
        event_id: String,
        attendee_limit: u32,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Sign-in failed: {0}")]
    Unauthenticated(String),

    /// Backend or transport failure
    #[error("Store error: {0}")]
    Store(String),
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Store(format!("BSON serialization error: {err}"))
    }
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event not found: {id}")),
            EventError::AlreadyRegistered { .. } => AppError::AlreadyRegistered(
                "You are already registered for this event".to_string(),
            ),
            EventError::EventFull { attendee_limit, .. } => AppError::EventFull(format!(
                "This event has reached its limit of {attendee_limit} attendees"
            )),
            EventError::Validation(message) => AppError::BadRequest(message),
            EventError::Unauthenticated(message) => AppError::Unauthorized(message),
            EventError::Store(message) => AppError::Database(message),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_http_status_mapping() {
        let cases = [
            (EventError::NotFound("e1".into()), StatusCode::NOT_FOUND),
            (
                EventError::AlreadyRegistered {
                    event_id: "e1".into(),
                    user_id: "u1".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EventError::EventFull {
                    event_id: "e1".into(),
                    attendee_limit: 3,
                },
                StatusCode::CONFLICT,
            ),
            (EventError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                EventError::Unauthenticated("no session".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                EventError::Store("timeout".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_error_maps_to_database() {
        let app: AppError = EventError::Store("socket closed".into()).into();
        assert!(matches!(app, AppError::Database(msg) if msg == "socket closed"));
    }
}
