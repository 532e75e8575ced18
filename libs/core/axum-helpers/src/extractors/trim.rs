//! Serde helpers that trim surrounding whitespace while deserializing.
//!
//! Used with `#[serde(deserialize_with = ...)]` so that `validator` length
//! rules run against the trimmed value.

use serde::{Deserialize, Deserializer};

pub fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Trims an optional string. Use together with `#[serde(default)]`.
pub fn trim_option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}

/// Trims every element of a string list.
pub fn trim_string_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<String>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|s| s.trim().to_string()).collect())
}

pub fn trim_option_string_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(values.map(|v| v.into_iter().map(|s| s.trim().to_string()).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(deserialize_with = "trim_string")]
        title: String,
        #[serde(default, deserialize_with = "trim_option_string")]
        location: Option<String>,
        #[serde(default, deserialize_with = "trim_string_vec")]
        tags: Vec<String>,
    }

    #[test]
    fn test_trims_fields() {
        let form: Form =
            serde_json::from_str(r#"{"title": "  Rust Meetup ", "location": " Berlin ", "tags": [" rust ", "meetup"]}"#)
                .unwrap();
        assert_eq!(form.title, "Rust Meetup");
        assert_eq!(form.location.as_deref(), Some("Berlin"));
        assert_eq!(form.tags, vec!["rust", "meetup"]);
    }

    #[test]
    fn test_missing_optional_fields() {
        let form: Form = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(form.location.is_none());
        assert!(form.tags.is_empty());
    }
}
