//! Account route handlers.
//!
//! Signup and login issue bearer tokens; logout revokes the one the request
//! presented. Account payloads never include the password hash or the token
//! list.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

/// Request to create an account.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Request to log in to an existing account.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account plus the bearer token issued for this session.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Create an account and issue its first bearer token.
///
/// POST /users
///
/// # Errors
///
/// Returns `AppError::Auth` if validation fails or the email is taken.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, token) = state
        .auth()
        .register(&req.name, &req.email, &req.address, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Verify credentials and issue a fresh bearer token.
///
/// POST /users/login
///
/// # Errors
///
/// Returns `AppError::Auth` if the credentials do not match an account.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, token) = state.auth().login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse { user, token }))
}

/// Revoke the bearer token this request authenticated with.
///
/// POST /users/logout
///
/// Other tokens issued to the same account stay valid.
///
/// # Errors
///
/// Returns `AppError::Auth` if the revocation cannot be persisted.
pub async fn logout(
    State(state): State<AppState>,
    mut auth: RequireAuth,
) -> Result<StatusCode, AppError> {
    state.auth().logout(&mut auth.user, &auth.token).await?;

    Ok(StatusCode::OK)
}

/// Return the authenticated account.
///
/// GET /users/me
pub async fn me(auth: RequireAuth) -> Json<User> {
    Json(auth.user)
}
