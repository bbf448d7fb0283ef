use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::AppError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Trimmed value, or a 400 naming the missing field.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::malformed(format!("{field} is required")))
}

pub fn valid_email(value: Option<&str>) -> Result<&str, AppError> {
    let email = required("email", value)?;

    if !EMAIL.is_match(email) {
        return Err(AppError::malformed("Invalid email address"));
    }

    Ok(email)
}

/// Human readable message from an upstream error body.
///
/// Looks for an `error` or `message` string in a JSON body, then falls back to
/// the raw text, then to `fallback`.
pub fn message_from_body(body: &str, fallback: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = json.get(key).and_then(Value::as_str) {
                if !message.trim().is_empty() {
                    return message.trim().to_string();
                }
            }
        }
    }

    let text = body.trim();
    if text.is_empty() || text.starts_with('{') {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("name", Some("  parcels ")).unwrap(), "parcels");
        assert!(required("name", Some("   ")).is_err());
        assert!(required("name", None).is_err());
    }

    #[test]
    fn test_required_names_field() {
        let err = required("workspace_id", None).unwrap_err();
        assert_eq!(err.to_string(), "workspace_id is required");
    }

    #[test]
    fn test_valid_email() {
        assert_eq!(valid_email(Some("a@b.co")).unwrap(), "a@b.co");
        assert!(valid_email(Some("not-an-email")).is_err());
        assert!(valid_email(Some("a b@c.d")).is_err());
        assert!(valid_email(None).is_err());
    }

    #[test]
    fn test_message_from_body() {
        assert_eq!(message_from_body(r#"{"error":"Bad password"}"#, "x"), "Bad password");
        assert_eq!(message_from_body(r#"{"message":"Gone"}"#, "x"), "Gone");
        assert_eq!(message_from_body("plain failure", "x"), "plain failure");
        assert_eq!(message_from_body("", "fallback"), "fallback");
        assert_eq!(message_from_body(r#"{"detail":1}"#, "fallback"), "fallback");
    }
}
