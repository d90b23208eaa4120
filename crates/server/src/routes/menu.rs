//! Menu route handlers.

use axum::{Json, extract::State};

use crate::middleware::RequireAuth;
use crate::models::MenuItem;
use crate::state::AppState;

/// Return the full menu catalog.
///
/// GET /menu
pub async fn index(State(state): State<AppState>, _auth: RequireAuth) -> Json<Vec<MenuItem>> {
    Json(state.menu().items().to_vec())
}
