//! Authentication extractor for route handlers.
//!
//! Resolves the `Authorization: Bearer` header to a live account before the
//! handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// The token must have been issued by this server and still be attached to
/// the account; logging out revokes it. The token itself is kept alongside
/// the user so logout handlers know which one to revoke.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireAuth {
    /// The authenticated account.
    pub user: User,
    /// The bearer token the request presented.
    pub token: String,
}

/// Error returned when bearer authentication fails.
pub enum AuthRejection {
    /// No `Authorization: Bearer` header on the request.
    MissingCredential,
    /// The token is malformed, forged, or has been revoked.
    InvalidCredential,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCredential => {
                (StatusCode::UNAUTHORIZED, "missing bearer token").into_response()
            }
            Self::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "invalid bearer token").into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthRejection::MissingCredential)?
            .to_string();

        let user = state
            .auth()
            .authenticate(&token)
            .await
            .map_err(|_| AuthRejection::InvalidCredential)?;

        Ok(Self { user, token })
    }
}
