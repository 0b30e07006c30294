use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::auth::model::{AuthenticatedUser, Session, UserRole};
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::validation::ValidationKind;

/// Request DTO for user registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequestDto {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(custom(function = "validate_confirm_password"))]
    pub confirm_password: String,

    pub role: UserRole,
}

/// Request DTO for user login
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginRequestDto {
    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(custom(function = "validate_login_password"))]
    pub password: String,
}

/// Response DTO for register/login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub session: Session,
    pub user: UserResponseDto,
}

/// Public view of a user (never carries the password)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<AuthenticatedUser> for UserResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: None,
        }
    }
}

fn missing(message: &'static str) -> ValidationError {
    ValidationError::new(ValidationKind::MissingField.code()).with_message(Cow::Borrowed(message))
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing("Name is required"));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing("Email is required"));
    }
    if !value.contains('@') {
        return Err(ValidationError::new(ValidationKind::InvalidFormat.code())
            .with_message(Cow::Borrowed("Please enter a valid email")));
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing("Password is required"));
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(ValidationKind::TooShort.code())
            .with_message(Cow::Borrowed("Password must be at least 6 characters")));
    }
    Ok(())
}

fn validate_confirm_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing("Please confirm your password"));
    }
    Ok(())
}

fn validate_login_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(missing("Password is required"));
    }
    Ok(())
}
