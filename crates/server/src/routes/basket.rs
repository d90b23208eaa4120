//! Basket route handlers.
//!
//! Both mutations respond with the updated account so clients can re-render
//! the basket without a second request.

use axum::{
    Json,
    extract::{Path, State},
};

use forno_core::ProductId;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

/// Append a product to the authenticated account's basket.
///
/// POST /addToBasket/{product_id}
///
/// The product ID is not checked against the catalog; an unknown ID prices
/// at zero when the order is placed.
///
/// # Errors
///
/// Returns `AppError::Checkout` if the updated account cannot be persisted.
pub async fn add(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    mut auth: RequireAuth,
) -> Result<Json<User>, AppError> {
    state
        .checkout()
        .update_basket(&mut auth.user, Some(product_id))
        .await?;

    Ok(Json(auth.user))
}

/// Empty the authenticated account's basket.
///
/// DELETE /clearBasket
///
/// # Errors
///
/// Returns `AppError::Checkout` if the updated account cannot be persisted.
pub async fn clear(
    State(state): State<AppState>,
    mut auth: RequireAuth,
) -> Result<Json<User>, AppError> {
    state.checkout().update_basket(&mut auth.user, None).await?;

    Ok(Json(auth.user))
}
