//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use forno_core::{Email, ProductId, UserId};

/// A registered account.
///
/// The password hash and the list of issued bearer tokens never leave the
/// server; both are skipped during serialization.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, used in receipt emails.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Delivery address.
    pub address: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Current basket, in insertion order. Entries may repeat.
    pub basket: Vec<ProductId>,
    /// Bearer tokens currently accepted for this account.
    #[serde(skip_serializing)]
    pub tokens: Vec<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with an empty basket and no issued tokens.
    #[must_use]
    pub fn new(name: String, email: Email, address: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            address,
            password_hash,
            basket: Vec::new(),
            tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the `updated_at` timestamp. Call before persisting a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
