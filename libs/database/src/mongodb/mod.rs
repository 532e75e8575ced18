//! MongoDB connector and health checks

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, DEFAULT_MONGODB_URI, MongoConfig, database_from_uri, redact_uri};
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::ping;

pub use mongodb::{Client, Collection, Database};
