//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration, login, and bearer token management
//! - `checkout` - Basket mutation and the payment intent lifecycle
//! - `mailgun` - Receipt email delivery

pub mod auth;
pub mod checkout;
pub mod mailgun;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService, ConfirmOutcome};
pub use mailgun::{MailError, Mailer, MailgunClient};
