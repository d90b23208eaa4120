//! Card processor integration.
//!
//! The checkout flow drives payment intents on an external processor through
//! the [`PaymentProcessor`] trait; [`StripeClient`] is the production
//! implementation. The processor is the source of truth for intent state:
//! nothing about an intent is stored locally.

pub mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the card processor.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Request to create a payment intent.
#[derive(Debug, Clone)]
pub struct CreateIntent {
    /// Amount in integer minor units (e.g., agorot).
    pub amount: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Email the processor sends its own receipt to.
    pub receipt_email: String,
}

/// A payment intent as returned by the processor.
///
/// Only the fields the service inspects are typed; everything else rides
/// along in `extra` so intent payloads pass through to clients unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor-assigned intent ID.
    pub id: String,
    /// Lifecycle status (e.g., `requires_confirmation`, `succeeded`).
    pub status: String,
    /// Charges created for this intent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<ChargeList>,
    /// Remaining response fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// List of charges attached to an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeList {
    /// The charges, most recent first.
    #[serde(default)]
    pub data: Vec<Charge>,
    /// Remaining response fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Hosted receipt URL for the charge.
    pub receipt_url: Option<String>,
    /// Remaining response fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentIntent {
    /// Status value of a successfully captured intent.
    pub const STATUS_SUCCEEDED: &'static str = "succeeded";

    /// Whether the processor reports the intent as captured.
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == Self::STATUS_SUCCEEDED
    }

    /// Receipt URL of the first charge, when present.
    #[must_use]
    pub fn receipt_url(&self) -> Option<&str> {
        self.charges.as_ref()?.data.first()?.receipt_url.as_deref()
    }
}

/// Operations the checkout flow needs from the card processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent for the given amount.
    async fn create_intent(&self, req: CreateIntent) -> Result<PaymentIntent, ProcessorError>;

    /// Confirm an intent with a payment method.
    async fn confirm_intent(
        &self,
        intent_id: &str,
        payment_method: &str,
    ) -> Result<PaymentIntent, ProcessorError>;

    /// Cancel an intent.
    async fn cancel_intent(&self, intent_id: &str) -> Result<PaymentIntent, ProcessorError>;
}
