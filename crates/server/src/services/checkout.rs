//! Basket and checkout lifecycle.
//!
//! One service owns the whole flow: basket mutation, pricing, and the
//! create/confirm/cancel round-trips against the card processor. The
//! processor holds all intent state; the only linkage between an account and
//! an intent is the intent ID the client carries between calls.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use forno_core::ProductId;

use crate::db::{MenuStore, StoreError, users::UserStore};
use crate::models::User;
use crate::payments::{CreateIntent, PaymentIntent, PaymentProcessor, ProcessorError};
use crate::pricing;
use crate::services::mailgun::Mailer;

/// Currency all orders are charged in.
const CURRENCY: &str = "ils";

/// Errors from basket and checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The basket prices to zero, so there is nothing to charge.
    #[error("cannot place an order for an empty basket")]
    EmptyBasket,

    /// The priced amount does not fit the processor's integer minor units.
    #[error("order amount out of range")]
    AmountOutOfRange,

    /// A succeeded intent came back without a receipt URL.
    #[error("processor reported success without a receipt URL")]
    MissingReceiptUrl,

    /// Card processor call failed.
    #[error("processor error: {0}")]
    Processor(#[from] ProcessorError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of confirming a payment intent.
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Payment captured; basket cleared and receipt email dispatched.
    Succeeded(PaymentIntent),
    /// The processor reported any status other than `succeeded`.
    NotSucceeded(PaymentIntent),
}

/// Basket and checkout lifecycle operations.
///
/// Owns handles to its collaborators so route handlers stay thin: the user
/// store for basket persistence, the catalog for pricing, the card processor
/// for the intent lifecycle, and the mailer for receipts.
#[derive(Clone)]
pub struct CheckoutService {
    users: Arc<dyn UserStore>,
    menu: MenuStore,
    processor: Arc<dyn PaymentProcessor>,
    mailer: Arc<dyn Mailer>,
}

impl CheckoutService {
    /// Create a new checkout service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        menu: MenuStore,
        processor: Arc<dyn PaymentProcessor>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            users,
            menu,
            processor,
            mailer,
        }
    }

    /// Append a product to the basket, or clear it when `product` is `None`.
    ///
    /// Product IDs are not checked against the catalog; an unknown ID simply
    /// prices at zero later.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Store` if the mutated account cannot be
    /// persisted; the call fails as a whole.
    pub async fn update_basket(
        &self,
        user: &mut User,
        product: Option<ProductId>,
    ) -> Result<(), CheckoutError> {
        match product {
            Some(product_id) => user.basket.push(product_id),
            None => user.basket.clear(),
        }
        user.touch();
        self.users.save(user).await?;
        Ok(())
    }

    /// Price the basket and open a payment intent for it.
    ///
    /// The amount is fixed here; confirming later never re-prices. A basket
    /// that prices to zero is refused before the processor is contacted.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyBasket` if there is nothing to charge.
    /// Returns `CheckoutError::Processor` if the processor call fails.
    pub async fn place_order(&self, user: &User) -> Result<PaymentIntent, CheckoutError> {
        let total = pricing::basket_total(&user.basket, self.menu.items());
        if total <= Decimal::ZERO {
            return Err(CheckoutError::EmptyBasket);
        }
        let amount = pricing::to_minor_units(total).ok_or(CheckoutError::AmountOutOfRange)?;

        let intent = self
            .processor
            .create_intent(CreateIntent {
                amount,
                currency: CURRENCY.to_string(),
                receipt_email: user.email.to_string(),
            })
            .await?;

        Ok(intent)
    }

    /// Confirm a payment intent with the given payment method.
    ///
    /// Branches on the status the processor reports back. On `succeeded` the
    /// basket is cleared (best-effort) and the receipt email is dispatched
    /// without being awaited; any other status is returned as
    /// [`ConfirmOutcome::NotSucceeded`] with the payload intact and the
    /// basket untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Processor` if the processor call fails.
    /// Returns `CheckoutError::MissingReceiptUrl` if a succeeded intent
    /// carries no receipt URL; the basket is left alone in that case.
    pub async fn confirm_order(
        &self,
        user: &User,
        intent_id: &str,
        payment_method: &str,
    ) -> Result<ConfirmOutcome, CheckoutError> {
        let intent = self
            .processor
            .confirm_intent(intent_id, payment_method)
            .await?;

        if !intent.is_succeeded() {
            return Ok(ConfirmOutcome::NotSucceeded(intent));
        }

        let receipt_url = intent
            .receipt_url()
            .ok_or(CheckoutError::MissingReceiptUrl)?
            .to_string();

        // Best-effort: the payment is already captured, so a storage failure
        // here must not turn the confirmation into an error response.
        let mut cleared = user.clone();
        cleared.basket.clear();
        cleared.touch();
        if let Err(error) = self.users.save(&cleared).await {
            tracing::warn!(user_id = %user.id, %error, "failed to clear basket after payment");
        }

        self.dispatch_receipt(user, receipt_url);

        Ok(ConfirmOutcome::Succeeded(intent))
    }

    /// Cancel a payment intent, returning the processor's response verbatim.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Processor` if the processor call fails.
    pub async fn cancel_payment(&self, intent_id: &str) -> Result<PaymentIntent, CheckoutError> {
        Ok(self.processor.cancel_intent(intent_id).await?)
    }

    /// Fire the receipt email without awaiting it.
    fn dispatch_receipt(&self, user: &User, receipt_url: String) {
        let mailer = Arc::clone(&self.mailer);
        let name = user.name.clone();
        let email = user.email.clone();

        tokio::spawn(async move {
            if let Err(error) = mailer.send_receipt(&name, &email, &receipt_url).await {
                tracing::warn!(%email, %error, "receipt email dispatch failed");
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use forno_core::Email;

    use crate::db::InMemoryUserStore;
    use crate::models::MenuItem;
    use crate::services::mailgun::MailError;

    struct StubProcessor {
        response: PaymentIntent,
        create_calls: AtomicUsize,
        last_create: Mutex<Option<CreateIntent>>,
    }

    impl StubProcessor {
        fn returning(response: PaymentIntent) -> Arc<Self> {
            Arc::new(Self {
                response,
                create_calls: AtomicUsize::new(0),
                last_create: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl PaymentProcessor for StubProcessor {
        async fn create_intent(&self, req: CreateIntent) -> Result<PaymentIntent, ProcessorError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_create.lock().unwrap() = Some(req);
            Ok(self.response.clone())
        }

        async fn confirm_intent(
            &self,
            _intent_id: &str,
            _payment_method: &str,
        ) -> Result<PaymentIntent, ProcessorError> {
            Ok(self.response.clone())
        }

        async fn cancel_intent(&self, _intent_id: &str) -> Result<PaymentIntent, ProcessorError> {
            Ok(self.response.clone())
        }
    }

    #[derive(Default)]
    struct CountingMailer {
        sends: AtomicUsize,
        last_url: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl Mailer for CountingMailer {
        async fn send_receipt(
            &self,
            _recipient_name: &str,
            _recipient_email: &Email,
            receipt_url: &str,
        ) -> Result<(), MailError> {
            *self.last_url.lock().unwrap() = Some(receipt_url.to_string());
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn intent(status: &str, receipt_url: Option<&str>) -> PaymentIntent {
        let mut raw = serde_json::json!({
            "id": "pi_test_1",
            "status": status,
        });
        if let Some(url) = receipt_url {
            raw["charges"] = serde_json::json!({ "data": [{ "receipt_url": url }] });
        }
        serde_json::from_value(raw).unwrap()
    }

    struct Harness {
        service: CheckoutService,
        users: Arc<InMemoryUserStore>,
        processor: Arc<StubProcessor>,
        mailer: Arc<CountingMailer>,
    }

    async fn harness(response: PaymentIntent) -> (Harness, User) {
        let users = Arc::new(InMemoryUserStore::new());
        let processor = StubProcessor::returning(response);
        let mailer = Arc::new(CountingMailer::default());

        let menu = MenuStore::new(vec![MenuItem::new(
            ProductId::new(1),
            "Margherita".to_string(),
            Decimal::new(100, 1),
        )]);

        let service = CheckoutService::new(
            Arc::clone(&users) as Arc<dyn UserStore>,
            menu,
            Arc::clone(&processor) as Arc<dyn PaymentProcessor>,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
        );

        let user = User::new(
            "Noa".to_string(),
            Email::parse("noa@example.com").unwrap(),
            "1 Herzl St".to_string(),
            "hash".to_string(),
        );
        users.insert(user.clone()).await.unwrap();

        (
            Harness {
                service,
                users,
                processor,
                mailer,
            },
            user,
        )
    }

    async fn wait_for_sends(mailer: &CountingMailer, expected: usize) {
        for _ in 0..100 {
            if mailer.sends.load(Ordering::SeqCst) == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mailer never reached {expected} sends");
    }

    #[tokio::test]
    async fn test_update_basket_appends_and_clears() {
        let (h, mut user) = harness(intent("requires_confirmation", None)).await;

        h.service
            .update_basket(&mut user, Some(ProductId::new(1)))
            .await
            .unwrap();
        h.service
            .update_basket(&mut user, Some(ProductId::new(1)))
            .await
            .unwrap();
        assert_eq!(user.basket.len(), 2);

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.basket, user.basket);

        h.service.update_basket(&mut user, None).await.unwrap();
        assert!(user.basket.is_empty());

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.basket.is_empty());
    }

    #[tokio::test]
    async fn test_place_order_empty_basket_never_contacts_processor() {
        let (h, user) = harness(intent("requires_confirmation", None)).await;

        let result = h.service.place_order(&user).await;
        assert!(matches!(result, Err(CheckoutError::EmptyBasket)));
        assert_eq!(h.processor.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_place_order_unknown_ids_only_is_refused() {
        let (h, mut user) = harness(intent("requires_confirmation", None)).await;
        user.basket.push(ProductId::new(99));

        let result = h.service.place_order(&user).await;
        assert!(matches!(result, Err(CheckoutError::EmptyBasket)));
        assert_eq!(h.processor.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_place_order_charges_minor_units() {
        let (h, mut user) = harness(intent("requires_confirmation", None)).await;
        user.basket.push(ProductId::new(1));
        user.basket.push(ProductId::new(1));

        h.service.place_order(&user).await.unwrap();

        assert_eq!(h.processor.create_calls.load(Ordering::SeqCst), 1);
        let req = h.processor.last_create.lock().unwrap().take().unwrap();
        assert_eq!(req.amount, 2000);
        assert_eq!(req.currency, "ils");
        assert_eq!(req.receipt_email, "noa@example.com");
    }

    #[tokio::test]
    async fn test_confirm_success_clears_basket_and_sends_one_email() {
        let receipt = "https://pay.example.com/receipts/1";
        let (h, mut user) = harness(intent("succeeded", Some(receipt))).await;
        user.basket.push(ProductId::new(1));
        h.users.save(&user).await.unwrap();

        let outcome = h
            .service
            .confirm_order(&user, "pi_test_1", "pm_card_visa")
            .await
            .unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Succeeded(_)));

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.basket.is_empty());

        wait_for_sends(&h.mailer, 1).await;
        assert_eq!(
            h.mailer.last_url.lock().unwrap().as_deref(),
            Some(receipt)
        );
    }

    #[tokio::test]
    async fn test_confirm_non_success_leaves_basket_and_sends_nothing() {
        let (h, mut user) = harness(intent("requires_action", None)).await;
        user.basket.push(ProductId::new(1));
        h.users.save(&user).await.unwrap();

        let outcome = h
            .service
            .confirm_order(&user, "pi_test_1", "pm_card_visa")
            .await
            .unwrap();
        let ConfirmOutcome::NotSucceeded(returned) = outcome else {
            panic!("expected NotSucceeded");
        };
        assert_eq!(returned.status, "requires_action");

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.basket, user.basket);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(h.mailer.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_confirm_success_without_receipt_url_fails_untouched() {
        let (h, mut user) = harness(intent("succeeded", None)).await;
        user.basket.push(ProductId::new(1));
        h.users.save(&user).await.unwrap();

        let result = h
            .service
            .confirm_order(&user, "pi_test_1", "pm_card_visa")
            .await;
        assert!(matches!(result, Err(CheckoutError::MissingReceiptUrl)));

        let stored = h.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.basket, user.basket);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(h.mailer.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_returns_processor_payload() {
        let (h, _user) = harness(intent("canceled", None)).await;

        let intent = h.service.cancel_payment("pi_test_1").await.unwrap();
        assert_eq!(intent.status, "canceled");
        assert_eq!(intent.id, "pi_test_1");
    }
}
