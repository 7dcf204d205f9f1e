//! Client-side input checks.
//!
//! Request payloads declare their field rules with `#[derive(Validate)]`
//! and are checked before any network call. Failures are reported per
//! field, in the order the form declares them, so a view can show each
//! message next to its input.

use std::borrow::Cow;
use std::fmt;

pub use validator::Validate;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Copy the first failure of each field in `fields` out of a derived
    /// validation result, keeping the order of `fields`.
    fn extend_ordered(&mut self, fields: &[&'static str], found: &validator::ValidationErrors) {
        let by_field = found.field_errors();
        for &field in fields {
            let first = by_field
                .iter()
                .find(|(name, _)| **name == field)
                .and_then(|(_, errors)| errors.first());
            if let Some(error) = first {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                self.add(field, message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// First message recorded for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A request payload that can be checked locally.
pub trait CheckRequest: Validate {
    /// Validated field names, in form order.
    const FIELDS: &'static [&'static str];

    /// Rules spanning several fields. Reported before field errors.
    fn check_form(&self, _errors: &mut ValidationErrors) {}

    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_form(&mut errors);
        if let Err(found) = self.validate() {
            errors.extend_ordered(Self::FIELDS, &found);
        }
        errors.into_result()
    }
}

/// Longest text the backend's string columns accept.
pub const MAX_COLUMN_LENGTH: usize = 255;

/// Build a field failure carrying a display message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Counts characters, not bytes.
pub(crate) fn within_column(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_COLUMN_LENGTH {
        return Err(invalid("length", "Must be at most 255 characters"));
    }
    Ok(())
}
