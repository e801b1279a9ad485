//! Structural validation results.
//!
//! Validation has two entry styles. The `validate_*` functions on each entity
//! module never fail the caller: they return [`Validated`], a discriminated
//! result carrying either the parsed entity or a field-by-field error list.
//! The strict `create*` constructors return `Result` and are for callers who
//! want fail-fast construction.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// One structural violation, addressed by field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of a non-throwing `validate_*` entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(Vec<FieldError>),
}

impl<T> Validated<T> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn into_result(self) -> Result<T, ValidationFailed> {
        match self {
            Validated::Valid(value) => Ok(value),
            Validated::Invalid(errors) => Err(ValidationFailed { errors }),
        }
    }
}

fn list_errors(errors: &[FieldError]) -> String {
    let parts: Vec<String> = errors.iter().map(FieldError::to_string).collect();
    parts.join("; ")
}

/// Strict-construction failure carrying every violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", list_errors(.errors))]
pub struct ValidationFailed {
    pub errors: Vec<FieldError>,
}

impl ValidationFailed {
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(path, message)],
        }
    }
}

/// Deserialize a raw document into `T`, then run the entity's own
/// structural check. Shared plumbing behind every `validate_*` entry point.
pub(crate) fn validate_raw<T, F>(raw: &serde_json::Value, check: F) -> Validated<T>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Vec<FieldError>,
{
    match serde_json::from_value::<T>(raw.clone()) {
        Err(err) => Validated::Invalid(vec![FieldError::new("$", err.to_string())]),
        Ok(value) => {
            let errors = check(&value);
            if errors.is_empty() {
                Validated::Valid(value)
            } else {
                Validated::Invalid(errors)
            }
        }
    }
}

/// Push an error when `value` is blank after trimming.
pub(crate) fn require_non_blank(errors: &mut Vec<FieldError>, path: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(path, "must not be blank"));
    }
}

/// Push an error when `value` trims to fewer than `min` characters.
pub(crate) fn require_min_len(errors: &mut Vec<FieldError>, path: &str, value: &str, min: usize) {
    if value.trim().chars().count() < min {
        errors.push(FieldError::new(
            path,
            format!("must be at least {min} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldError, Validated, ValidationFailed, require_min_len, require_non_blank};

    #[test]
    fn min_len_counts_trimmed_chars() {
        let mut errors = Vec::new();
        require_min_len(&mut errors, "attack", "   short   ", 20);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("20"));

        errors.clear();
        require_min_len(&mut errors, "attack", "a perfectly long enough attack", 20);
        assert!(errors.is_empty());
    }

    #[test]
    fn blank_includes_whitespace_only() {
        let mut errors = Vec::new();
        require_non_blank(&mut errors, "statement", "   \t ");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn validation_failed_lists_every_field() {
        let failed = ValidationFailed {
            errors: vec![
                FieldError::new("attack", "must be at least 20 characters"),
                FieldError::new("targetId", "must be absent"),
            ],
        };
        let message = failed.to_string();
        assert!(message.contains("attack"));
        assert!(message.contains("targetId"));
    }

    #[test]
    fn validated_into_result() {
        let valid: Validated<u8> = Validated::Valid(1);
        assert!(valid.into_result().is_ok());
        let invalid: Validated<u8> = Validated::Invalid(vec![FieldError::new("x", "bad")]);
        assert!(invalid.into_result().is_err());
    }
}
