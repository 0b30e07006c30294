use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::model::{Session, User};
use crate::modules::storage::{read_json, write_json, KeyValueStore};
use crate::shared::constants::CURRENT_USER_KEY;

/// The single current-user session kept under the `currentUser` key
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn current(&self) -> Result<Option<Session>> {
        Ok(read_json(self.store.as_ref(), CURRENT_USER_KEY).await?)
    }

    /// Start a session for `user`, replacing any existing one
    pub async fn begin(&self, user: &User) -> Result<Session> {
        let session = Session::from(user);
        write_json(self.store.as_ref(), CURRENT_USER_KEY, &session).await?;
        tracing::info!("Session started for user {}", session.id);
        Ok(session)
    }

    pub async fn end(&self) -> Result<()> {
        self.store.remove(CURRENT_USER_KEY).await?;
        tracing::info!("Session ended");
        Ok(())
    }
}
