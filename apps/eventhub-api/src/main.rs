use axum::{Json, Router, routing::get};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use axum_helpers::JwtAuth;
use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    api::events::init_indexes(&db).await?;
    api::auth::init_indexes(&db).await?;

    let jwt = JwtAuth::new(&config.jwt);
    let state = AppState {
        config,
        mongo_client,
        db,
        jwt,
    };

    let api_routes = api::routes(&state);

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(root_router());

    info!("Starting EventHub API with graceful shutdown (30s timeout)");

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("EventHub API shutdown complete");
    Ok(())
}

/// `GET /` banner
fn root_router() -> Router {
    Router::new().route("/", get(root))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Event Management Server is running!"
    }))
}
