//! Authentication error types.

use thiserror::Error;

use crate::db::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] forno_core::EmailError),

    /// A required field was empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Bearer token missing its signature, malformed, or revoked.
    #[error("invalid bearer token")]
    InvalidToken,

    /// Token signing failed.
    #[error("token signing error")]
    TokenSigning,

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
