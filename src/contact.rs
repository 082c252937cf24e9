use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ACKNOWLEDGEMENT: &str = "Thank you for your message! I will get back to you soon.";
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

/// Named form fields, sorted by field name regardless of form order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactSubmission {
    fields: BTreeMap<String, String>,
}

impl ContactSubmission {
    /// Later duplicates of a field name replace earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.fields
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.fields).unwrap_or(serde_json::Value::Null)
    }

    /// Field names with value lengths, safe to log without the contents.
    pub fn shape(&self) -> serde_json::Value {
        let shape: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::from(value.chars().count())))
            .collect();
        serde_json::Value::Object(shape)
    }

    pub fn validate(&self, max_bytes: usize) -> Result<(), &'static str> {
        if self.byte_len() > max_bytes {
            return Err("submission_too_large");
        }

        for field in REQUIRED_FIELDS {
            if self.get(field).map_or(true, |value| value.trim().is_empty()) {
                return Err(match field {
                    "name" => "missing_name",
                    "email" => "missing_email",
                    _ => "missing_message",
                });
            }
        }

        if !self.get("email").is_some_and(|email| email.contains('@')) {
            return Err("invalid_email");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ContactSubmission {
        ContactSubmission::from_pairs([
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("subject", "Hello"),
            ("message", "Loved the carousel."),
        ])
    }

    #[test]
    fn complete_submission_validates() {
        assert_eq!(complete().validate(8_192), Ok(()));
    }

    #[test]
    fn blank_required_field_is_reported() {
        let submission = ContactSubmission::from_pairs([
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("message", "   "),
        ]);
        assert_eq!(submission.validate(8_192), Err("missing_message"));
        assert_eq!(ContactSubmission::default().validate(8_192), Err("missing_name"));
    }

    #[test]
    fn email_needs_an_at_sign() {
        let submission = ContactSubmission::from_pairs([
            ("name", "Ada"),
            ("email", "ada.example.com"),
            ("message", "hi"),
        ]);
        assert_eq!(submission.validate(8_192), Err("invalid_email"));
    }

    #[test]
    fn oversized_submission_is_rejected_first() {
        assert_eq!(complete().validate(10), Err("submission_too_large"));
    }

    #[test]
    fn serializes_as_flat_object() {
        let json = serde_json::to_string(&complete()).expect("serializes");
        assert!(json.starts_with(r#"{"email":"ada@example.com""#));

        let parsed: ContactSubmission = serde_json::from_str(&json).expect("parses back");
        assert_eq!(parsed, complete());
    }

    #[test]
    fn fields_are_sorted_by_name_not_form_order() {
        let submission = ContactSubmission::from_pairs([
            ("name", "Ada"),
            ("message", "Hello"),
            ("email", "ada@example.com"),
        ]);
        let json = submission.to_json();
        let keys: Vec<&str> = json
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();

        assert_eq!(keys, ["email", "message", "name"]);
    }

    #[test]
    fn shape_hides_values() {
        let shape = complete().shape();
        assert_eq!(shape["name"], 3);
        assert_eq!(shape["message"], 19);
        assert!(!shape.to_string().contains("Ada"));
    }
}
