//! Typed forms submitted by readers.
//!
//! Fields default to empty strings so a missing field reaches validation and
//! is reported inline instead of failing request decoding. Values are trimmed
//! as they are decoded, so validation and storage see the same text.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// New comment on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(
        custom(function = "required"),
        length(max = 80, message = "Ensure this value has at most 80 characters.")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(custom(function = "email_address"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(custom(function = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub body: String,
}

/// Recommend a post to someone by email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(
        custom(function = "required"),
        length(max = 25, message = "Ensure this value has at most 25 characters.")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(custom(function = "email_address"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(custom(function = "email_address"))]
    #[serde(deserialize_with = "trimmed")]
    pub to: String,
    #[serde(deserialize_with = "trimmed")]
    pub comments: String,
}

/// Field-keyed validation messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required."));
    }
    Ok(())
}

fn email_address(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if !value.trim().validate_email() {
        return Err(error("email", "Enter a valid email address."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_form_requires_all_fields() {
        let form = CommentForm {
            name: "  ".into(),
            email: String::new(),
            body: String::new(),
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_share_form_comments_optional() {
        let form = EmailPostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "bob@example.com".into(),
            comments: String::new(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_decoding_trims_before_length_check() {
        let padded = format!("  {}  ", "x".repeat(80));
        let json = serde_json::json!({
            "name": padded,
            "email": " ann@example.com ",
            "body": "\tHello\n",
        });
        let form: CommentForm = serde_json::from_value(json).unwrap();

        assert_eq!(form.name.len(), 80);
        assert_eq!(form.email, "ann@example.com");
        assert_eq!(form.body, "Hello");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_decoding_missing_fields_defaults_to_empty() {
        let form: EmailPostForm = serde_json::from_str(r#"{"name": " Ann "}"#).unwrap();
        assert_eq!(form.name, "Ann");
        assert!(form.to.is_empty());
        assert!(form.comments.is_empty());
    }

    #[test]
    fn test_share_form_rejects_bad_recipient() {
        let form = EmailPostForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            to: "not-an-address".into(),
            comments: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("to"));
    }
}
