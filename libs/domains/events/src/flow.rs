//! Registration attempts from an interactive caller.
//!
//! An attempt either redirects to the event's external page, asks the
//! caller to authenticate first, or registers the current user. When
//! authentication is required the caller receives a [`PendingRegistration`]
//! and hands it back to [`RegistrationFlow::complete_sign_in`] once the
//! user has signed in. Nothing is kept between calls.

use crate::auth::AuthGate;
use crate::error::Result;
use crate::models::{Event, EventView, User};
use crate::repository::EventRepository;
use crate::service::EventService;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Registration intent recorded while the user was anonymous
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistration {
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationAttempt {
    /// Registration happens off-site at this URL
    Redirect(String),
    /// Nothing was written; sign in, then complete with this intent
    AuthenticationRequired(PendingRegistration),
    Registered(Event),
}

/// What replaying a pending registration did
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOutcome {
    /// The event registers off-site; nothing was written
    Redirect(String),
    Registered(Event),
}

#[derive(Debug)]
pub struct SignInOutcome {
    pub user: User,
    /// Result of replaying the pending registration, if there was one
    pub replay: Option<Result<ReplayOutcome>>,
}

pub struct RegistrationFlow<'a, R: EventRepository, A: AuthGate> {
    service: &'a EventService<R>,
    auth: &'a A,
}

impl<'a, R: EventRepository, A: AuthGate> RegistrationFlow<'a, R, A> {
    pub fn new(service: &'a EventService<R>, auth: &'a A) -> Self {
        Self { service, auth }
    }

    /// Try to register the current user for `event`.
    ///
    /// The external link is checked before the auth gate is consulted.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn attempt(&self, event: &EventView) -> Result<RegistrationAttempt> {
        if let Some(url) = &event.external_link {
            info!(%url, "Redirecting to external registration");
            return Ok(RegistrationAttempt::Redirect(url.clone()));
        }

        let Some(user) = self.auth.current_user() else {
            info!("Anonymous registration attempt deferred");
            return Ok(RegistrationAttempt::AuthenticationRequired(
                PendingRegistration {
                    event_id: event.id.clone(),
                },
            ));
        };

        let updated = self.service.register(&event.id, &user.id).await?;
        Ok(RegistrationAttempt::Registered(updated))
    }

    /// Sign in, then replay `pending` exactly once.
    ///
    /// The pending event is reloaded first, so an event with an external
    /// link redirects here too. On sign-in failure the error is returned
    /// and `pending` stays with the caller.
    #[instrument(skip(self))]
    pub async fn complete_sign_in(
        &self,
        pending: Option<PendingRegistration>,
    ) -> Result<SignInOutcome> {
        let user = self.auth.sign_in().await?;

        let replay = match pending {
            Some(pending) => Some(self.replay(&pending.event_id, &user).await),
            None => None,
        };

        Ok(SignInOutcome { user, replay })
    }

    async fn replay(&self, event_id: &str, user: &User) -> Result<ReplayOutcome> {
        let event = self.service.get_event(event_id, Some(&user.id)).await?;
        if let Some(url) = event.external_link {
            info!(event_id, %url, "Deferred registration redirects to external page");
            return Ok(ReplayOutcome::Redirect(url));
        }

        info!(event_id, "Replaying deferred registration");
        let updated = self.service.register(event_id, &user.id).await?;
        Ok(ReplayOutcome::Registered(updated))
    }
}
