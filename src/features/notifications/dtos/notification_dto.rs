use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::notifications::models::{NewToast, ToastType};
use crate::shared::constants::MAX_TOAST_DURATION_MS;
use crate::shared::validation::ValidationKind;

/// Request DTO for raising a toast
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateToastDto {
    #[serde(rename = "type")]
    pub kind: ToastType,

    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,

    /// Milliseconds; omitted or 0 uses the default
    #[validate(range(
        max = MAX_TOAST_DURATION_MS,
        message = "Duration cannot exceed 60000 milliseconds"
    ))]
    pub duration: Option<u64>,
}

impl From<CreateToastDto> for NewToast {
    fn from(dto: CreateToastDto) -> Self {
        Self {
            kind: dto.kind,
            title: dto.title,
            message: dto.message,
            duration: dto.duration,
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(ValidationKind::MissingField.code())
            .with_message("This field is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::FieldErrors;

    fn toast(duration: Option<u64>) -> CreateToastDto {
        CreateToastDto {
            title: "Heads up".to_string(),
            message: "Maintenance tonight".to_string(),
            duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_duration_within_cap_is_valid() {
        assert!(toast(None).validate().is_ok());
        assert!(toast(Some(0)).validate().is_ok());
        assert!(toast(Some(MAX_TOAST_DURATION_MS)).validate().is_ok());
    }

    #[test]
    fn test_duration_over_cap_is_rejected() {
        let errors = FieldErrors::from(
            toast(Some(MAX_TOAST_DURATION_MS + 1))
                .validate()
                .unwrap_err(),
        );
        assert_eq!(errors.kind_of("duration"), Some(ValidationKind::InvalidFormat));
    }

    #[test]
    fn test_blank_title_is_missing() {
        let mut dto = toast(None);
        dto.title = "  ".to_string();
        let errors = FieldErrors::from(dto.validate().unwrap_err());
        assert_eq!(errors.kind_of("title"), Some(ValidationKind::MissingField));
    }
}
