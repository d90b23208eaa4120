//! Authentication service.
//!
//! Provides password registration, login, and bearer token management.
//!
//! Tokens are HS256-signed JWTs carrying the user ID, and every issued token
//! is also recorded on the account. A token is accepted only while it remains
//! recorded there, so revoking one session never touches the others.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use forno_core::{Email, UserId};

use crate::db::{StoreError, users::UserStore};
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Substring passwords must not contain, compared case-insensitively.
const FORBIDDEN_PASSWORD_SUBSTRING: &str = "password";

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID the token was issued to.
    sub: String,
    /// Unique token ID; tokens issued within the same second must still differ.
    jti: String,
    /// Issue time (seconds since the Unix epoch).
    iat: i64,
}

/// Authentication service.
///
/// Handles user registration, login, bearer token issue and verification.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Create a new authentication service signing tokens with `token_secret`.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, token_secret: &SecretString) -> Self {
        let secret = token_secret.expose_secret().as_bytes();

        // Tokens never expire; they are revoked by removal from the account.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    // =========================================================================
    // Registration and Login
    // =========================================================================

    /// Register a new user and issue their first bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmptyField` if the name or address is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        address: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        // Validate inputs
        let email = Email::parse(email)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyField("name"));
        }
        let address = address.trim();
        if address.is_empty() {
            return Err(AuthError::EmptyField("address"));
        }
        let password = password.trim();
        validate_password(password)?;

        // Hash password
        let password_hash = hash_password(password)?;

        // Create user with their first session token
        let mut user = User::new(
            name.to_string(),
            email,
            address.to_string(),
            password_hash,
        );
        let token = self.sign_token(user.id)?;
        user.tokens.push(token.clone());

        self.users.insert(user.clone()).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Store(other),
        })?;

        Ok((user, token))
    }

    /// Login with email and password, issuing a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        // A malformed email is indistinguishable from a wrong one here
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        // Get user
        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Verify password
        verify_password(password, &user.password_hash)?;

        // Record the new session token
        let token = self.sign_token(user.id)?;
        user.tokens.push(token.clone());
        user.touch();
        self.users.save(&user).await?;

        Ok((user, token))
    }

    // =========================================================================
    // Bearer Tokens
    // =========================================================================

    /// Resolve a bearer token to its account.
    ///
    /// The token must carry a valid signature and still be recorded on the
    /// account; a revoked token fails even when the signature checks out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token cannot be accepted.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?
            .claims;

        let user_id = UserId::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.tokens.iter().any(|t| t == token) {
            return Err(AuthError::InvalidToken);
        }

        Ok(user)
    }

    /// Revoke one bearer token. Other sessions stay valid.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the account cannot be persisted.
    pub async fn logout(&self, user: &mut User, token: &str) -> Result<(), AuthError> {
        user.tokens.retain(|t| t != token);
        user.touch();
        self.users.save(user).await?;
        Ok(())
    }

    /// Sign a bearer token for a user ID.
    fn sign_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: chrono::Utc::now().timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenSigning)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    if password
        .to_lowercase()
        .contains(FORBIDDEN_PASSWORD_SUBSTRING)
    {
        return Err(AuthError::WeakPassword(format!(
            "password cannot contain \"{FORBIDDEN_PASSWORD_SUBSTRING}\""
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
