//! Events API routes

use crate::state::AppState;
use axum::Router;
use domain_events::{EventService, EventsState, MongoEventRepository, events_router};
use tracing::info;

/// Create the events router over MongoDB
pub fn router(state: &AppState) -> Router {
    let repository = MongoEventRepository::new(&state.db);
    let service = EventService::new(repository);

    events_router(EventsState::new(service, state.jwt.clone()))
}

/// Initialize event indexes in MongoDB
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    let repository = MongoEventRepository::new(db);
    repository
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
