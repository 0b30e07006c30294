use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, RegisterRequestDto, UserResponseDto,
};
use crate::features::auth::model::{AuthenticatedUser, User};
use crate::features::auth::services::{SessionStore, UserStore};
use crate::modules::storage::KeyValueStore;
use crate::shared::validation::{FieldErrors, ValidationKind};

/// Service for authentication operations (register, login, logout)
pub struct AuthService {
    users: UserStore,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            users: UserStore::new(Arc::clone(&store)),
            sessions: SessionStore::new(store),
        }
    }

    #[cfg(test)]
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Register a new user and log them in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let mut errors = dto.validate().err().map(FieldErrors::from).unwrap_or_default();
        if !dto.password.is_empty()
            && !dto.confirm_password.is_empty()
            && dto.password != dto.confirm_password
        {
            errors.add(
                "confirmPassword",
                ValidationKind::Mismatch,
                "Passwords do not match",
            );
        }
        errors.into_result()?;

        let user = User {
            id: Uuid::now_v7().to_string(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            password: dto.password,
            role: dto.role,
            created_at: Utc::now(),
        };

        let user = self.users.insert(user).await?;
        let session = self.sessions.begin(&user).await?;

        Ok(AuthResponseDto {
            session,
            user: to_response(&user),
        })
    }

    /// Log in with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        dto.validate().map_err(FieldErrors::from)?;

        let email = dto.email.trim();
        let user = self
            .users
            .find_by_email(email)
            .await?
            .filter(|u| u.password == dto.password)
            .ok_or_else(|| {
                tracing::warn!("Failed login attempt for {}", email);
                AppError::InvalidCredentials
            })?;

        let session = self.sessions.begin(&user).await?;

        Ok(AuthResponseDto {
            session,
            user: to_response(&user),
        })
    }

    pub async fn logout(&self) -> Result<()> {
        self.sessions.end().await
    }

    /// Resolve the current session to its user, if any
    pub async fn current_user(&self) -> Result<Option<AuthenticatedUser>> {
        let Some(session) = self.sessions.current().await? else {
            return Ok(None);
        };

        let user = self.users.find_by_id(&session.id).await?;
        if user.is_none() {
            tracing::warn!("Session refers to unknown user {}", session.id);
        }
        Ok(user.as_ref().map(AuthenticatedUser::from))
    }

    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<UserResponseDto> {
        let created_at = self
            .users
            .find_by_id(&user.id)
            .await?
            .map(|u| u.created_at);
        let mut dto = UserResponseDto::from(user);
        dto.created_at = created_at;
        Ok(dto)
    }
}

fn to_response(user: &User) -> UserResponseDto {
    UserResponseDto {
        id: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        created_at: Some(user.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::modules::storage::MemoryKvStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryKvStore::new()))
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: UserRole::Staff,
        }
    }

    #[tokio::test]
    async fn test_register_starts_session() {
        let service = service();
        let response = service.register(register_dto("ada@campus.edu")).await.unwrap();

        assert_eq!(response.session.email, "ada@campus.edu");
        let current = service.current_user().await.unwrap().unwrap();
        assert_eq!(current.id, response.user.id);
        assert!(current.can_update_reports());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_and_list_unchanged() {
        let service = service();
        service.register(register_dto("ada@campus.edu")).await.unwrap();

        let err = service
            .register(register_dto("ada@campus.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateAccount(_)));
        assert_eq!(service.users().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = service();

        let err = service
            .register(RegisterRequestDto::default())
            .await
            .unwrap_err();
        let AppError::FieldValidation(errors) = err else {
            panic!("expected field validation error");
        };
        assert_eq!(errors.kind_of("name"), Some(ValidationKind::MissingField));
        assert_eq!(errors.kind_of("email"), Some(ValidationKind::MissingField));
        assert_eq!(errors.kind_of("password"), Some(ValidationKind::MissingField));
        assert_eq!(
            errors.kind_of("confirmPassword"),
            Some(ValidationKind::MissingField)
        );

        let mut dto = register_dto("ada@campus.edu");
        dto.password = "abc".to_string();
        dto.confirm_password = "abd".to_string();
        let AppError::FieldValidation(errors) = service.register(dto).await.unwrap_err() else {
            panic!("expected field validation error");
        };
        assert_eq!(errors.kind_of("password"), Some(ValidationKind::TooShort));
        assert_eq!(
            errors.kind_of("confirmPassword"),
            Some(ValidationKind::Mismatch)
        );

        let mut dto = register_dto("not-an-email");
        dto.email = "not-an-email".to_string();
        let AppError::FieldValidation(errors) = service.register(dto).await.unwrap_err() else {
            panic!("expected field validation error");
        };
        assert_eq!(errors.kind_of("email"), Some(ValidationKind::InvalidFormat));
        assert!(service.users().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let service = service();
        service.register(register_dto("ada@campus.edu")).await.unwrap();
        service.logout().await.unwrap();
        assert!(service.current_user().await.unwrap().is_none());

        let err = service
            .login(LoginRequestDto {
                email: "ada@campus.edu".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert!(service.current_user().await.unwrap().is_none());

        let response = service
            .login(LoginRequestDto {
                email: "ada@campus.edu".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "ada@campus.edu");
        assert!(service.current_user().await.unwrap().is_some());
    }
}
