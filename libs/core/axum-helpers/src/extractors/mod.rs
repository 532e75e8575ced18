//! Extractors that validate input and reject with the JSON error envelope.

pub mod trim;
pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

use std::borrow::Cow;
use std::fmt::Display;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Turn a deserialization failure into a single-field [`ValidationErrors`]
/// so it renders with the same `errors` list as a failed `validate()`.
///
/// `source` names the field when the failure has no path, e.g. `body`.
pub(crate) fn deserialize_errors<E: Display>(
    err: serde_path_to_error::Error<E>,
    source: &'static str,
) -> ValidationErrors {
    let detail = err.inner().to_string();
    let (field, message) = if err.path().iter().next().is_some() {
        let field = err.path().to_string();
        let message = format!("Invalid value for {}", field);
        (field, message)
    } else if let Some(missing) = missing_field(&detail) {
        (missing.to_string(), format!("{} is required", missing))
    } else {
        (source.to_string(), format!("Invalid {}: {}", source, detail))
    };

    let mut error = ValidationError::new("invalid_type");
    error.message = Some(Cow::Owned(message));

    let mut errors = ValidationErrors::new();
    errors
        .errors_mut()
        .insert(Cow::Owned(field), ValidationErrorsKind::Field(vec![error]));
    errors
}

/// Field name out of serde's "missing field `name`" message
fn missing_field(detail: &str) -> Option<&str> {
    detail
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .filter(|name| !name.is_empty())
}
