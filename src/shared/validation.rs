use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::shared::constants::{AFFECTED_AREAS, BUILDINGS, MIN_DESCRIPTION_LENGTH};
use crate::shared::types::FieldErrorDto;

lazy_static! {
    /// Regex for validating contact emails
    /// Exactly one "@", at least one "." after it, no whitespace
    /// - Valid: "foo@bar.com", "a.b@campus.edu"
    /// - Invalid: "foo@bar", "foo bar@x.com", "@x.com", "foo@@x.com"
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Classification of a single field validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ValidationKind {
    MissingField,
    InvalidFormat,
    TooShort,
    NoSelection,
    Mismatch,
}

impl ValidationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationKind::MissingField => "missing_field",
            ValidationKind::InvalidFormat => "invalid_format",
            ValidationKind::TooShort => "too_short",
            ValidationKind::NoSelection => "no_selection",
            ValidationKind::Mismatch => "mismatch",
        }
    }

    /// Map a `validator` error code back to a kind. Codes produced by the
    /// built-in validators fall back to `InvalidFormat`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "missing_field" => ValidationKind::MissingField,
            "too_short" => ValidationKind::TooShort,
            "no_selection" => ValidationKind::NoSelection,
            "mismatch" => ValidationKind::Mismatch,
            _ => ValidationKind::InvalidFormat,
        }
    }

    fn error(self, message: &'static str) -> ValidationError {
        ValidationError::new(self.code()).with_message(Cow::Borrowed(message))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: ValidationKind,
    pub message: String,
}

/// Validation failures keyed by wire field name, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field` unless one is already recorded
    pub fn add(&mut self, field: &str, kind: ValidationKind, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert(FieldError {
            kind,
            message: message.into(),
        });
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn kind_of(&self, field: &str) -> Option<ValidationKind> {
        self.0.get(field).map(|e| e.kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_dto(&self) -> BTreeMap<String, FieldErrorDto> {
        self.0
            .iter()
            .map(|(field, e)| {
                (
                    field.clone(),
                    FieldErrorDto {
                        kind: e.kind.code().to_string(),
                        message: e.message.clone(),
                    },
                )
            })
            .collect()
    }

    /// Add every failure from `other` for fields not yet recorded
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, error) in other.0 {
            self.0.entry(field).or_insert(error);
        }
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, e)| format!("{}: {}", field, e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        // Sort for a deterministic pick when a field carries several errors
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, errs) in fields {
            if let Some(first) = errs.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.add(
                    &to_camel_case(&field),
                    ValidationKind::from_code(&first.code),
                    message,
                );
            }
        }
        out
    }
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// REPORT FIELD VALIDATORS
// =============================================================================

pub fn validate_location(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationKind::MissingField.error("Location is required"));
    }
    Ok(())
}

pub fn validate_building(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationKind::MissingField.error("Building is required"));
    }
    if !BUILDINGS.contains(&value) {
        return Err(ValidationKind::InvalidFormat.error("Unknown building"));
    }
    Ok(())
}

/// An empty description reports the length rule, not a missing field
pub fn validate_description(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
        return Err(ValidationKind::TooShort.error("Description must be at least 10 characters"));
    }
    Ok(())
}

pub fn validate_affected_areas(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationKind::NoSelection.error("Select at least one affected area"));
    }
    if values.iter().any(|v| !AFFECTED_AREAS.contains(&v.as_str())) {
        return Err(ValidationKind::InvalidFormat.error("Unknown affected area"));
    }
    Ok(())
}

pub fn validate_contact_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationKind::MissingField.error("Email is required"));
    }
    if !EMAIL_REGEX.is_match(value) {
        return Err(ValidationKind::InvalidFormat.error("Invalid email address"));
    }
    Ok(())
}
