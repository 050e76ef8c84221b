//! HTTP handlers for the events API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use axum_helpers::{
    JwtAuth, MaybeClaims,
    errors::responses::{
        BadRequestQueryResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
    },
    optional_jwt_auth_middleware,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::auth::RequestAuth;
use crate::error::Result;
use crate::flow::{PendingRegistration, RegistrationAttempt, RegistrationFlow, ReplayOutcome};
use crate::models::{EventFilter, EventFormat, EventStatus, EventView, Instructor, User};
use crate::repository::EventRepository;
use crate::service::EventService;

pub const TAG: &str = "Events";

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(list_events, get_event, register_for_event, resume_registration),
    components(
        schemas(
            EventView,
            EventStatus,
            EventFormat,
            Instructor,
            User,
            RegisterResponse,
            ResumeRegistrationRequest,
            ResumeRegistrationResponse,
            PendingRegistration
        ),
        responses(
            NotFoundResponse,
            BadRequestQueryResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Event discovery and registration")
    )
)]
pub struct ApiDoc;

/// Query string for listing events
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
    pub instructor_id: Option<String>,
    /// Comma-separated; an event matches when it has any of them
    pub tags: Option<String>,
}

impl EventQuery {
    fn into_filter(self, user_id: Option<String>) -> EventFilter {
        let tags = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        EventFilter {
            status: self.status,
            instructor_id: self.instructor_id,
            tags,
            user_id,
        }
    }
}

/// Outcome of a registration attempt
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegisterResponse {
    /// Register on the external page instead
    Redirect { url: String },
    /// Sign in, then call `/resume-registration` with this id
    AuthenticationRequired {
        #[serde(rename = "pendingEventId")]
        pending_event_id: String,
    },
    Registered { event: EventView },
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRegistrationRequest {
    /// Event remembered from an `authentication_required` response
    #[serde(default)]
    pub pending_event_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRegistrationResponse {
    pub user: User,
    /// Outcome of the replayed registration, absent when nothing was pending
    #[serde(flatten)]
    pub registration: Option<RegisterResponse>,
}

type SharedService<R> = State<Arc<EventService<R>>>;

/// Create the events router. Requests are authenticated optionally.
pub fn events_router<R: EventRepository + 'static>(service: EventService<R>, jwt: JwtAuth) -> Router {
    Router::new()
        .route("/", get(list_events::<R>))
        .route("/resume-registration", post(resume_registration::<R>))
        .route("/{id}", get(get_event::<R>))
        .route("/{id}/register", post(register_for_event::<R>))
        .with_state(Arc::new(service))
        .layer(middleware::from_fn_with_state(
            jwt,
            optional_jwt_auth_middleware,
        ))
}

/// List events
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(EventQuery),
    responses(
        (status = 200, description = "Matching events ordered by date and time", body = Vec<EventView>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(service, claims))]
async fn list_events<R: EventRepository>(
    State(service): SharedService<R>,
    MaybeClaims(claims): MaybeClaims,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<EventView>>> {
    let filter = query.into_filter(claims.map(|c| c.sub));
    Ok(Json(service.list_events(filter).await?))
}

/// Get an event by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event found", body = EventView),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(service, claims))]
async fn get_event<R: EventRepository>(
    State(service): SharedService<R>,
    MaybeClaims(claims): MaybeClaims,
    Path(id): Path<String>,
) -> Result<Json<EventView>> {
    let viewer = claims.as_ref().map(|c| c.sub.as_str());
    Ok(Json(service.get_event(&id, viewer).await?))
}

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/{id}/register",
    tag = TAG,
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registration happens on an external page", body = RegisterResponse),
        (status = 201, description = "Registered", body = RegisterResponse),
        (status = 401, description = "Sign in first; nothing was written", body = RegisterResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(service, claims))]
async fn register_for_event<R: EventRepository>(
    State(service): SharedService<R>,
    MaybeClaims(claims): MaybeClaims,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let auth = RequestAuth::new(claims.as_ref());
    let viewer = claims.as_ref().map(|c| c.sub.as_str());
    let event = service.get_event(&id, viewer).await?;

    let (status, body) = match RegistrationFlow::new(&*service, &auth).attempt(&event).await? {
        RegistrationAttempt::Redirect(url) => (StatusCode::OK, RegisterResponse::Redirect { url }),
        RegistrationAttempt::AuthenticationRequired(pending) => (
            StatusCode::UNAUTHORIZED,
            RegisterResponse::AuthenticationRequired {
                pending_event_id: pending.event_id,
            },
        ),
        RegistrationAttempt::Registered(updated) => (
            StatusCode::CREATED,
            RegisterResponse::Registered {
                event: EventView::for_viewer(updated, viewer),
            },
        ),
    };

    Ok((status, Json(body)))
}

/// Finish a deferred registration after signing in
#[utoipa::path(
    post,
    path = "/resume-registration",
    tag = TAG,
    request_body = ResumeRegistrationRequest,
    responses(
        (status = 200, description = "Signed in; nothing pending, or the event registers on an external page", body = ResumeRegistrationResponse),
        (status = 201, description = "Signed in and registered", body = ResumeRegistrationResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(service, claims))]
async fn resume_registration<R: EventRepository>(
    State(service): SharedService<R>,
    MaybeClaims(claims): MaybeClaims,
    Json(request): Json<ResumeRegistrationRequest>,
) -> Result<(StatusCode, Json<ResumeRegistrationResponse>)> {
    let auth = RequestAuth::new(claims.as_ref());
    let pending = request
        .pending_event_id
        .map(|event_id| PendingRegistration { event_id });

    let outcome = RegistrationFlow::new(&*service, &auth)
        .complete_sign_in(pending)
        .await?;

    let (status, registration) = match outcome.replay {
        Some(replay) => match replay? {
            ReplayOutcome::Redirect(url) => (StatusCode::OK, Some(RegisterResponse::Redirect { url })),
            ReplayOutcome::Registered(updated) => (
                StatusCode::CREATED,
                Some(RegisterResponse::Registered {
                    event: EventView::for_viewer(updated, Some(&outcome.user.id)),
                }),
            ),
        },
        None => (StatusCode::OK, None),
    };

    Ok((
        status,
        Json(ResumeRegistrationResponse {
            user: outcome.user,
            registration,
        }),
    ))
}
