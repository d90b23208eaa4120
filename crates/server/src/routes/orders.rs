//! Payment lifecycle route handlers.
//!
//! These routes drive the card processor. Intent state lives entirely on the
//! processor side; the `{id}` path segment is the intent ID returned by
//! `placeOrder`, carried by the client between calls.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::payments::PaymentIntent;
use crate::services::ConfirmOutcome;
use crate::state::AppState;

/// Request to confirm a payment intent.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// Processor payment method token (card token).
    pub payment_method: String,
}

/// Response from opening a payment intent.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    /// Intent ID, repeated at the top level for convenience.
    pub id: String,
    pub intent: PaymentIntent,
}

/// Response wrapping a processor intent payload.
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub intent: PaymentIntent,
}

/// Price the basket and open a payment intent for it.
///
/// GET /placeOrder
///
/// # Errors
///
/// Returns `AppError::Checkout` if the basket prices to zero or the
/// processor call fails.
pub async fn place(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<PlaceOrderResponse>, AppError> {
    let intent = state.checkout().place_order(&auth.user).await?;

    Ok(Json(PlaceOrderResponse {
        id: intent.id.clone(),
        intent,
    }))
}

/// Confirm a payment intent with the supplied payment method.
///
/// POST /confirmOrder/{id}
///
/// Responds 200 with the intent when the processor reports `succeeded`, and
/// 400 with the intent payload for any other reported status.
///
/// # Errors
///
/// Returns `AppError::Checkout` if the processor call itself fails or a
/// succeeded intent carries no receipt URL.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: RequireAuth,
    Json(req): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<IntentResponse>), AppError> {
    let outcome = state
        .checkout()
        .confirm_order(&auth.user, &id, &req.payment_method)
        .await?;

    let (status, intent) = match outcome {
        ConfirmOutcome::Succeeded(intent) => (StatusCode::OK, intent),
        ConfirmOutcome::NotSucceeded(intent) => (StatusCode::BAD_REQUEST, intent),
    };

    Ok((status, Json(IntentResponse { intent })))
}

/// Cancel a payment intent.
///
/// POST /cancelPayment/{id}
///
/// # Errors
///
/// Returns `AppError::Checkout` if the processor call fails.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: RequireAuth,
) -> Result<Json<IntentResponse>, AppError> {
    let intent = state.checkout().cancel_payment(&id).await?;

    Ok(Json(IntentResponse { intent }))
}
