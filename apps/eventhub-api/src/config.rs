use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let mongodb = MongoConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            mongodb,
            jwt,
        })
    }

    /// The `access_token` cookie is marked `Secure` outside development
    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-that-is-at-least-32-chars";

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("APP_ENV", None),
                ("PORT", None),
                ("MONGODB_URI", None),
                ("MONGODB_URL", None),
                ("MONGODB_DATABASE", None),
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_TTL_SECS", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "eventhub_api");
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.server.port, 5000);
                assert_eq!(config.mongodb.database(), "eventmanagement");
                assert_eq!(config.jwt.ttl_secs, 7 * 24 * 60 * 60);
                assert!(!config.secure_cookies());
            },
        );
    }

    #[test]
    fn test_production_uses_secure_cookies() {
        temp_env::with_vars(
            [("APP_ENV", Some("production")), ("JWT_SECRET", Some(SECRET))],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.secure_cookies());
            },
        );
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        temp_env::with_var_unset("JWT_SECRET", || {
            assert!(Config::from_env().is_err());
        });
    }
}
