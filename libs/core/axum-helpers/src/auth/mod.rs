//! Stateless JWT authentication.
//!
//! - [`JwtConfig`]: signing secret and token lifetime, loaded from the environment
//! - [`JwtAuth`]: issues and verifies HS256 tokens
//! - [`jwt_auth_middleware`]: rejects requests without a valid token and
//!   inserts [`JwtClaims`] into request extensions
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::{extract_token_from_request, jwt_auth_middleware};
