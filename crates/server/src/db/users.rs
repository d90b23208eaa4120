//! User account storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use forno_core::{Email, UserId};

use crate::db::StoreError;
use crate::models::User;

/// Storage for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    async fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Persist changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no user with this ID exists.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Look up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;
}

/// In-memory user store backed by a `HashMap` keyed by user ID.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }
}
