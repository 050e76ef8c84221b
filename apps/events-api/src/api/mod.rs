//! API routes
//!
//! Nested under `/api` by `axum_helpers::create_router`.

pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .merge(health::router(state.clone()))
}
