use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token subject: {0}")]
    InvalidToken(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            UserError::DuplicateEmail(_) => {
                AppError::BadRequest("User already exists with this email".to_string())
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::InvalidToken(_) => AppError::Unauthorized("Token is not valid".to_string()),
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
            UserError::Token(msg) => AppError::InternalServerError(msg),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

/// `true` for a unique index violation (E11000)
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UserError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                UserError::DuplicateEmail("ada@example.com".into()),
                StatusCode::BAD_REQUEST,
            ),
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::InvalidToken("nope".into()), StatusCode::UNAUTHORIZED),
            (UserError::PasswordHash("bad salt".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (UserError::Database("timeout".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_duplicate_email_message() {
        let app_error = AppError::from(UserError::DuplicateEmail("ada@example.com".into()));
        assert!(matches!(
            app_error,
            AppError::BadRequest(ref msg) if msg == "User already exists with this email"
        ));
    }
}
