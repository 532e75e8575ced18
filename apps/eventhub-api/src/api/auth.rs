//! Auth API routes

use crate::state::AppState;
use axum::Router;
use domain_users::{AuthState, MongoUserRepository, UserService, handlers};
use tracing::info;

/// Create the auth router over MongoDB
pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    let service = UserService::new(repository);

    handlers::router(
        AuthState::new(service, state.jwt.clone())
            .with_secure_cookies(state.config.secure_cookies()),
    )
}

/// Initialize the unique e-mail index
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
