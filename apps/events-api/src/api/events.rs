//! Events API routes backed by MongoDB

use crate::state::AppState;
use axum::Router;
use domain_events::{EventService, MongoEventRepository};
use tracing::info;

pub fn router(state: &AppState) -> Router {
    let service = EventService::new(MongoEventRepository::new(&state.db));
    domain_events::events_router(service, state.jwt.clone())
}

/// Initialize event indexes in MongoDB
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes ready");
    Ok(())
}
