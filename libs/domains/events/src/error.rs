//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Action an organizer-only check guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EventAction {
    Update,
    Delete,
}

#[derive(Debug, Error)]
pub enum EventError {
    /// Unknown or malformed id
    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("User {user_id} may not {action} event {event_id}")]
    Forbidden {
        action: EventAction,
        event_id: String,
        user_id: String,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid token subject: {0}")]
    InvalidToken(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) => AppError::NotFound("Event not found".to_string()),
            EventError::Forbidden { action, .. } => {
                AppError::Forbidden(format!("Not authorized to {} this event", action))
            }
            EventError::Validation(errors) => AppError::ValidationError(errors),
            EventError::InvalidDate(_) => {
                AppError::BadRequest("Please enter a valid date".to_string())
            }
            EventError::InvalidToken(_) => AppError::Unauthorized("Token is not valid".to_string()),
            EventError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}
