//! Events Domain
//!
//! Event discovery and registration with an attendee limit.
//!
//! Registration is a single conditional update in the store: the user is
//! added only if they are not registered yet and a seat is free. Callers
//! that are not signed in get a [`PendingRegistration`] back and replay it
//! through [`RegistrationFlow::complete_sign_in`] after authenticating.
//! Events with an external link never reach the store; the caller is
//! redirected instead.
//!
//! # Layout
//!
//! - [`EventRepository`]: storage seam, backed by [`MongoEventRepository`]
//!   or [`InMemoryEventRepository`]
//! - [`EventService`]: listing, lookup, registration and seeding
//! - [`RegistrationFlow`]: redirect / defer / register decision
//! - [`handlers`]: axum routes mounted under `/api/events`

mod auth;
mod error;
mod flow;
pub mod handlers;
mod memory;
mod models;
pub mod mongodb;
mod repository;
pub mod seed;
mod service;

pub use auth::{AuthGate, RequestAuth};
pub use error::{EventError, Result};
pub use flow::{
    PendingRegistration, RegistrationAttempt, RegistrationFlow, ReplayOutcome, SignInOutcome,
};
pub use handlers::{
    ApiDoc, EventQuery, RegisterResponse, ResumeRegistrationRequest, ResumeRegistrationResponse,
    events_router,
};
pub use memory::InMemoryEventRepository;
pub use models::{
    Event, EventFilter, EventFormat, EventStatus, EventView, Instructor, NewEvent, User,
};
pub use self::mongodb::{EVENTS_COLLECTION, MongoEventRepository};
pub use repository::EventRepository;
pub use service::EventService;
