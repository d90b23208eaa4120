//! Mailgun API client for receipt emails.
//!
//! Receipts are the only mail this service sends. Delivery is best-effort by
//! design: the checkout flow dispatches sends without awaiting them, so a
//! mail outage never blocks or fails an order.

use async_trait::async_trait;
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use forno_core::Email;

use crate::config::MailgunConfig;

/// Subject line for receipt emails.
const RECEIPT_SUBJECT: &str = "Invoice";

/// Display name on the fixed sender address.
const SENDER_NAME: &str = "Forno Delivery";

/// Body text preceding the receipt link.
const RECEIPT_BODY: &str =
    "Thank you for choosing us! Your order will be delivered soon!\n\n Here is link for your receipt: ";

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Outbound mail delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a receipt email for a paid order.
    async fn send_receipt(
        &self,
        recipient_name: &str,
        recipient_email: &Email,
        receipt_url: &str,
    ) -> Result<(), MailError>;
}

/// Mailgun API client.
#[derive(Clone)]
pub struct MailgunClient {
    client: reqwest::Client,
    api_base: Url,
    api_key: SecretString,
    domain: String,
}

impl MailgunClient {
    /// Create a new Mailgun client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailgunConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            domain: config.domain.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/{}/messages",
            self.api_base.as_str().trim_end_matches('/'),
            self.domain
        )
    }

    fn sender(&self) -> String {
        format!("{SENDER_NAME} <postmaster@{}>", self.domain)
    }
}

#[async_trait]
impl Mailer for MailgunClient {
    async fn send_receipt(
        &self,
        recipient_name: &str,
        recipient_email: &Email,
        receipt_url: &str,
    ) -> Result<(), MailError> {
        let form = multipart::Form::new()
            .text("subject", RECEIPT_SUBJECT)
            .text("from", self.sender())
            .text("to", format!("{recipient_name} <{recipient_email}>"))
            .text("text", format!("{RECEIPT_BODY}{receipt_url}"));

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(self.api_key.expose_secret()))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
