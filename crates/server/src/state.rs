//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{InMemoryUserStore, MenuStore, users::UserStore};
use crate::payments::{PaymentProcessor, ProcessorError, stripe::StripeClient};
use crate::services::{AuthService, CheckoutService, MailError, Mailer, MailgunClient};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("card processor client error: {0}")]
    Processor(#[from] ProcessorError),
    #[error("mail client error: {0}")]
    Mail(#[from] MailError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the account store, the catalog, and the
/// outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    menu: MenuStore,
    auth: AuthService,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state with live outbound clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the card processor or mail client cannot be
    /// constructed from the configuration.
    pub fn new(config: AppConfig, menu: MenuStore) -> Result<Self, StateError> {
        let processor = Arc::new(StripeClient::new(&config.stripe)?);
        let mailer = Arc::new(MailgunClient::new(&config.mailgun)?);

        Ok(Self::with_collaborators(config, menu, processor, mailer))
    }

    /// Create application state around the given collaborators.
    ///
    /// Used by tests to substitute the processor or mailer.
    #[must_use]
    pub fn with_collaborators(
        config: AppConfig,
        menu: MenuStore,
        processor: Arc<dyn PaymentProcessor>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        let auth = AuthService::new(Arc::clone(&users), &config.token_secret);
        let checkout = CheckoutService::new(users, menu.clone(), processor, mailer);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                menu,
                auth,
                checkout,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the menu catalog.
    #[must_use]
    pub fn menu(&self) -> &MenuStore {
        &self.inner.menu
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
