//! Query string extractor with `validator` checks.

use super::deserialize_errors;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query extractor with automatic validation.
///
/// Unparseable values (e.g. `page=abc`) and failed validation both reject
/// with a 400 [`AppError`] listing the offending parameter.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let deserializer =
            serde_urlencoded::Deserializer::new(form_urlencoded::parse(query.as_bytes()));
        let params: T = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| AppError::ValidationError(deserialize_errors(e, "query")))?;
        params.validate()?;
        Ok(ValidatedQuery(params))
    }
}
