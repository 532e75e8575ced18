//! JSON body extractor with `validator` checks.

use super::deserialize_errors;
use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// A missing content type or unparseable JSON rejects as a JSON extraction
/// error. A body that parses but has the wrong shape (missing field, wrong
/// type) rejects like failed validation, with the offending field listed.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) -> String {
///     payload.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        let data: T = serde_path_to_error::deserialize(value)
            .map_err(|e| AppError::ValidationError(deserialize_errors(e, "body")))?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
