use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::User;
use crate::modules::storage::{read_json, write_json, KeyValueStore};
use crate::shared::constants::USERS_KEY;

/// Ordered list of registered users kept under the `users` key
pub struct UserStore {
    store: Arc<dyn KeyValueStore>,
    // Registration is read-modify-write on a single document
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(read_json::<Vec<User>>(self.store.as_ref(), USERS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.email == email))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }

    /// Append a user; the email must not be registered yet
    pub async fn insert(&self, user: User) -> Result<User> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.list().await?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateAccount(
                "Email already registered".to_string(),
            ));
        }

        users.push(user.clone());
        write_json(self.store.as_ref(), USERS_KEY, &users).await?;

        tracing::info!("User registered: id={}, role={}", user.id, user.role);
        Ok(user)
    }
}
