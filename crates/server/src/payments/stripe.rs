//! Card processor REST client.
//!
//! Speaks the processor's form-encoded payment intent API: create, confirm,
//! cancel. Success is judged by HTTP status; intent payloads are returned
//! as-is so callers and clients see exactly what the processor said.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use url::Url;

use crate::config::StripeConfig;

use super::{CreateIntent, PaymentIntent, PaymentProcessor, ProcessorError};

/// Payment method types offered on created intents.
const PAYMENT_METHOD_TYPE: &str = "card";

/// Card processor REST client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: Url,
}

impl StripeClient {
    /// Create a new processor client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, ProcessorError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| ProcessorError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base.as_str().trim_end_matches('/'))
    }

    /// Read an intent out of a processor response, or surface the error body.
    async fn read_intent(response: reqwest::Response) -> Result<PaymentIntent, ProcessorError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProcessorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProcessorError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_intent(&self, req: CreateIntent) -> Result<PaymentIntent, ProcessorError> {
        let url = self.endpoint("/v1/payment_intents");

        let params = [
            ("amount", req.amount.to_string()),
            ("currency", req.currency),
            ("payment_method_types[]", PAYMENT_METHOD_TYPE.to_string()),
            ("receipt_email", req.receipt_email),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        Self::read_intent(response).await
    }

    async fn confirm_intent(
        &self,
        intent_id: &str,
        payment_method: &str,
    ) -> Result<PaymentIntent, ProcessorError> {
        let url = self.endpoint(&format!("/v1/payment_intents/{intent_id}/confirm"));

        let params = [("payment_method", payment_method)];

        let response = self.client.post(&url).form(&params).send().await?;
        Self::read_intent(response).await
    }

    async fn cancel_intent(&self, intent_id: &str) -> Result<PaymentIntent, ProcessorError> {
        let url = self.endpoint(&format!("/v1/payment_intents/{intent_id}/cancel"));

        let response = self.client.post(&url).send().await?;
        Self::read_intent(response).await
    }
}
