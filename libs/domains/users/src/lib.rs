//! Users Domain
//!
//! Registration, login and the current-user lookup.
//!
//! # Features
//!
//! - Password hashing with Argon2
//! - HS256 tokens issued through [`axum_helpers::JwtAuth`], returned in the body
//!   and as an `access_token` cookie
//! - MongoDB storage with a unique e-mail index, plus an in-memory repository
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /register, /login, /me
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Password hashing, credential checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + MongoDB / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, password policy
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{AuthState, InMemoryUserRepository, UserService, handlers};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let jwt = JwtAuth::new(&JwtConfig::new("a-development-secret-of-32-chars!!"));
//! let router = handlers::router(AuthState::new(service, jwt));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, AuthState};
pub use models::{
    AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, User, UserResponse,
};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
