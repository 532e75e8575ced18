#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/eventmanagement";
pub const DEFAULT_DATABASE: &str = "eventmanagement";

/// MongoDB connection settings
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::new("mongodb://localhost:27017/eventmanagement");
/// assert_eq!(config.database(), "eventmanagement");
///
/// let config = MongoConfig::from_env()?; // requires the `config` feature
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string: mongodb://[user:pass@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Optional application name reported to the server
    pub app_name: Option<String>,

    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Build a config from a URI, taking the database name from its path
    /// (or `eventmanagement` when the path is empty).
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let database =
            database_from_uri(&url).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        Self::with_database(url, database)
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection string with any `user:pass@` userinfo masked, safe to log
    pub fn redacted_url(&self) -> String {
        redact_uri(&self.url)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MONGODB_URI)
    }
}

/// Database name embedded in a connection string path, if any.
pub fn database_from_uri(uri: &str) -> Option<String> {
    let rest = uri
        .strip_prefix("mongodb+srv://")
        .or_else(|| uri.strip_prefix("mongodb://"))?;
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();

    (!name.is_empty()).then(|| name.to_string())
}

/// Replace the userinfo section of a connection string with `***`.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://***@{}", scheme, &rest[at + 1..]),
        None => uri.to_string(),
    }
}

/// Environment variables:
/// - `MONGODB_URI` or `MONGODB_URL` (default: `mongodb://localhost:27017/eventmanagement`)
/// - `MONGODB_DATABASE` (default: database in the URI path, else `eventmanagement`)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (default: 100), `MONGODB_MIN_POOL_SIZE` (default: 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("MONGODB_URI")
            .or_else(|_| std::env::var("MONGODB_URL"))
            .unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string());

        let mut config = match std::env::var("MONGODB_DATABASE") {
            Ok(database) if !database.trim().is_empty() => {
                Self::with_database(url, database.trim())
            }
            _ => Self::new(url),
        };

        config.app_name = std::env::var("MONGODB_APP_NAME").ok();
        config.max_pool_size = env_parse("MONGODB_MAX_POOL_SIZE", config.max_pool_size)?;
        config.min_pool_size = env_parse("MONGODB_MIN_POOL_SIZE", config.min_pool_size)?;
        config.connect_timeout_secs =
            env_parse("MONGODB_CONNECT_TIMEOUT_SECS", config.connect_timeout_secs)?;
        config.server_selection_timeout_secs = env_parse(
            "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            config.server_selection_timeout_secs,
        )?;

        Ok(config)
    }
}
