use axum_helpers::extractors::trim::trim_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

/// User entity as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", with = "bson::serde_helpers::uuid_1_as_binary")]
    pub id: Uuid,
    pub name: String,
    /// Always stored lowercased
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email: email.to_lowercase(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User as returned by the API (no password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trim_string")]
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[serde(default, deserialize_with = "trim_string")]
    #[validate(
        email(message = "Please enter a valid email"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    #[schema(example = "ada@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Secret123")]
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trim_string")]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register/login response: the issued token and the user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Password policy: 6..=128 chars with a lowercase letter, an uppercase letter and a digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();

    if len < PASSWORD_MIN_LEN {
        return Err(ValidationError::new("password_too_short")
            .with_message("Password must be at least 6 characters".into()));
    }

    if len > PASSWORD_MAX_LEN {
        return Err(ValidationError::new("password_too_long")
            .with_message("Password cannot exceed 128 characters".into()));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::new("password_too_weak").with_message(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .into(),
        ));
    }

    Ok(())
}
