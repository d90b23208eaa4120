//! Storage layer.
//!
//! Accounts live in process memory behind the [`UserStore`] trait so tests
//! can substitute their own stores; the menu catalog is loaded once at
//! startup and read-only afterwards.

pub mod menu;
pub mod users;

pub use menu::{MenuLoadError, MenuStore};
pub use users::{InMemoryUserStore, UserStore};

use thiserror::Error;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
