//! HTTP-level building blocks: CORS, security headers and the success envelope.
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_cors_layer(origins));
//! ```

pub mod cors;
pub mod envelope;
pub mod security;

pub use cors::{create_cors_layer, create_permissive_cors_layer, parse_allowed_origins};
pub use envelope::MessageResponse;
pub use security::security_headers;
