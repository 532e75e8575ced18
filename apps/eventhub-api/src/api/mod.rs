//! API routes module
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod auth;
pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .nest("/auth", auth::router(state))
        .merge(health::router(state.clone()))
}
