//! Per-field validation messages.

use std::collections::BTreeMap;

use serde::Serialize;

/// Validation messages keyed by form field name.
///
/// Field names are the form's `name` attributes, so templates can look a
/// message up by the same key they render the input with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty set of errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record `message` for `field` if `value` is blank after trimming.
    ///
    /// Returns `true` if the value was present.
    pub fn require(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            false
        } else {
            true
        }
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `true` if `field` has a message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field has a message.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Email is required");
        errors.add("email", "Email is invalid");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_require_trims() {
        let mut errors = FieldErrors::new();
        assert!(!errors.require("name", "   ", "Name is required"));
        assert!(errors.require("phone", " 555 ", "Phone is required"));
        assert!(errors.has("name"));
        assert!(!errors.has("phone"));
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        let mut errors = FieldErrors::new();
        errors.add("x", "bad");
        assert!(errors.into_result().is_err());
    }
}
