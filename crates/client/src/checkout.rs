//! Checkout Orchestrator
//!
//! `Editing → Submitting → Confirmed`. Any failure drops back to `Editing`
//! with the error kept in [`CheckoutOrchestrator::last_error`]. Nothing is
//! retried automatically.

use jiff::Zoned;
use rusty_money::iso::Currency;
use thiserror::Error;
use tiffin::{
    cart::CartStore,
    payment::{PaymentDetails, PaymentValidationError},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    api::{ApiError, CheckoutApi, PaymentInfo, PaymentItem, SavePayment},
    auth::Session,
    receipt::Receipt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// The cart may be changed freely.
    Editing,

    /// A payment request is in flight.
    Submitting,

    /// The server acknowledged the payment.
    Confirmed,
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    InvalidPayment(#[from] PaymentValidationError),

    /// Submitting while a confirmed order has not been acknowledged.
    #[error("order already confirmed")]
    AlreadyConfirmed,

    #[error("payment failed: {0}")]
    Api(#[from] ApiError),
}

/// What an idempotency key covers: every line's item, quantity and price,
/// plus the total.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderContent {
    lines: Vec<(Uuid, u32, u64)>,
    total: u64,
}

impl OrderContent {
    fn of(cart: &CartStore) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| (line.item_id, line.quantity, line.unit_price))
                .collect(),
            total: cart.total(),
        }
    }
}

/// The idempotency key of the last attempt and the order it was sent with.
#[derive(Debug, Clone)]
struct Attempt {
    content: OrderContent,
    key: Uuid,
}

#[derive(Debug)]
pub struct CheckoutOrchestrator<A> {
    api: A,
    currency: &'static Currency,
    state: CheckoutState,
    attempt: Option<Attempt>,
    last_error: Option<CheckoutError>,
    receipt: Option<Receipt>,
}

impl<A: CheckoutApi> CheckoutOrchestrator<A> {
    pub fn new(api: A, currency: &'static Currency) -> Self {
        Self {
            api,
            currency,
            state: CheckoutState::Editing,
            attempt: None,
            last_error: None,
            receipt: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Why the last submission failed, until the next one starts.
    #[must_use]
    pub fn last_error(&self) -> Option<&CheckoutError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Key for `content`. Reused only while the order is identical, so a
    /// retry after a failure cannot create a second payment and a different
    /// order never rides on an earlier key.
    fn idempotency_key(&mut self, content: OrderContent) -> Uuid {
        match &self.attempt {
            Some(attempt) if attempt.content == content => attempt.key,
            _ => {
                let key = Uuid::now_v7();

                self.attempt = Some(Attempt { content, key });

                key
            }
        }
    }

    /// [`Self::submit`] with the card expiry checked against the local
    /// calendar year.
    ///
    /// # Errors
    ///
    /// As [`Self::submit`].
    pub async fn submit_now(
        &mut self,
        session: &Session,
        cart: &mut CartStore,
        details: PaymentDetails,
    ) -> Result<&Receipt, CheckoutError> {
        self.submit(session, cart, details, current_year()).await
    }

    /// Validate the card, send the order and, once the server confirms it,
    /// empty `cart`.
    ///
    /// `details` is consumed so the card number and CVV are wiped as soon as
    /// the masked card has been derived.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, or the API error. The cart is
    /// left untouched on error.
    pub async fn submit(
        &mut self,
        session: &Session,
        cart: &mut CartStore,
        details: PaymentDetails,
        current_year: i32,
    ) -> Result<&Receipt, CheckoutError> {
        if self.state == CheckoutState::Confirmed {
            return Err(CheckoutError::AlreadyConfirmed);
        }

        let request = self.prepare(cart, details, current_year)?;

        self.state = CheckoutState::Submitting;
        self.last_error = None;

        match self.api.save_payment(session.token(), &request).await {
            Ok(saved) => {
                let receipt = Receipt::from_payment(saved.payment, self.currency);

                info!(token_number = %receipt.token_number(), "order confirmed");

                cart.clear();

                self.state = CheckoutState::Confirmed;
                self.attempt = None;

                Ok(self.receipt.insert(receipt))
            }
            Err(error) => {
                warn!(retryable = error.is_retryable(), "payment failed: {error}");

                Err(self.fail(error.into()))
            }
        }
    }

    fn prepare(
        &mut self,
        cart: &CartStore,
        details: PaymentDetails,
        current_year: i32,
    ) -> Result<SavePayment, CheckoutError> {
        if cart.is_empty() {
            return Err(self.fail(CheckoutError::EmptyCart));
        }

        let card = details.validate(current_year);

        drop(details);

        let card = card.map_err(|error| self.fail(error.into()))?;

        Ok(SavePayment {
            cart_items: cart.lines().iter().map(PaymentItem::from).collect(),
            total_price: cart.total(),
            payment_info: PaymentInfo {
                card_type: card.card_type,
                card_name: card.name_on_card,
                card_number: card.last4,
                expiration_date: card.expiry,
            },
            idempotency_key: self.idempotency_key(OrderContent::of(cart)),
        })
    }

    fn fail(&mut self, error: CheckoutError) -> CheckoutError {
        self.state = CheckoutState::Editing;
        self.last_error = Some(error.clone());

        error
    }

    /// Leave the confirmation screen and start a new order.
    pub fn start_new_order(&mut self) {
        self.state = CheckoutState::Editing;
        self.receipt = None;
        self.last_error = None;
    }
}

/// The calendar year in the system time zone.
#[must_use]
pub fn current_year() -> i32 {
    i32::from(Zoned::now().year())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use reqwest::StatusCode;
    use rusty_money::iso::LKR;
    use testresult::TestResult;
    use tiffin::{cart::CartItem, payment::PaymentField, tokens::TokenNumber};

    use crate::{
        api::{MockCheckoutApi, Payment, PaymentSaved, StoredPaymentInfo},
        auth::tests::token_for,
    };

    use super::*;

    const YEAR: i32 = 2026;

    fn session() -> TestResult<Session> {
        Ok(Session::from_token(token_for(Uuid::now_v7())?)?)
    }

    fn details() -> PaymentDetails {
        PaymentDetails {
            card_type: "Visa".to_string(),
            name_on_card: "Alice Perera".to_string(),
            card_number: "4111111111111234".to_string(),
            expiry_month: "07".to_string(),
            expiry_year: "2030".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn rice_cart() -> TestResult<CartStore> {
        let mut cart = CartStore::new();

        cart.add(
            CartItem {
                item_id: Uuid::now_v7(),
                name: "Rice".to_string(),
                image_ref: None,
            },
            2,
            300,
        )?;

        Ok(cart)
    }

    fn saved(request: &SavePayment, token_number: u64) -> PaymentSaved {
        PaymentSaved {
            message: "Payment successful".to_string(),
            payment: Payment {
                id: Uuid::now_v7(),
                token_number: TokenNumber::new(token_number),
                short_code: TokenNumber::new(token_number).short_code(),
                cart_items: request.cart_items.clone(),
                total_price: request.total_price,
                payment_info: StoredPaymentInfo {
                    card_type: request.payment_info.card_type.clone(),
                    card_name: request.payment_info.card_name.clone(),
                    last4: request.payment_info.card_number.clone(),
                    expiration_date: request.payment_info.expiration_date.clone(),
                },
                idempotency_key: Some(request.idempotency_key),
                created_at: jiff::Timestamp::UNIX_EPOCH,
            },
        }
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "Service temporarily unavailable, please retry".to_string(),
        }
    }

    #[tokio::test]
    async fn confirmed_payment_produces_receipt_and_clears_cart() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .once()
            .withf(|_, request| {
                request.total_price == 600
                    && request.payment_info.card_number == "1234"
                    && request.cart_items.len() == 1
            })
            .returning(|_, request| Ok(saved(request, 1_042)));

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let mut cart = rice_cart()?;

        let short_code = checkout
            .submit(&session()?, &mut cart, details(), YEAR)
            .await?
            .short_code();

        assert_eq!(short_code, "042");
        assert_eq!(
            checkout.receipt().map(Receipt::token_number),
            Some(TokenNumber::new(1_042))
        );
        assert_eq!(checkout.state(), CheckoutState::Confirmed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_card_stays_editing_and_names_the_field() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment().never();

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let mut cart = rice_cart()?;
        let mut details = details();
        details.card_number = "411111111111123".to_string();

        let result = checkout.submit(&session()?, &mut cart, details, YEAR).await;

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidPayment(PaymentValidationError {
                field: PaymentField::CardNumber,
                ..
            }))
        ));
        assert_eq!(checkout.state(), CheckoutState::Editing);
        assert!(checkout.last_error().is_some());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_submitted() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment().never();

        let mut checkout = CheckoutOrchestrator::new(api, LKR);

        let result = checkout
            .submit(&session()?, &mut CartStore::new(), details(), YEAR)
            .await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_payment_returns_to_editing_with_cart_intact() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .once()
            .returning(|_, _| Err(unavailable()));

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let mut cart = rice_cart()?;

        let result = checkout.submit(&session()?, &mut cart, details(), YEAR).await;

        assert!(matches!(result, Err(CheckoutError::Api(_))));
        assert_eq!(checkout.state(), CheckoutState::Editing);
        assert!(matches!(checkout.last_error(), Some(CheckoutError::Api(_))));
        assert_eq!(cart.total(), 600);
        assert!(checkout.receipt().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn resubmitting_unchanged_cart_reuses_the_key() -> TestResult {
        let keys = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&keys);
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .times(2)
            .returning(move |_, request| {
                if let Ok(mut keys) = seen.lock() {
                    keys.push(request.idempotency_key);
                }

                Err(unavailable())
            });

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let session = session()?;
        let mut cart = rice_cart()?;

        assert!(checkout.submit(&session, &mut cart, details(), YEAR).await.is_err());
        assert!(checkout.submit(&session, &mut cart, details(), YEAR).await.is_err());

        let keys = keys.lock().map(|keys| keys.clone()).unwrap_or_default();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.first(), keys.last());

        Ok(())
    }

    #[tokio::test]
    async fn changing_the_cart_regenerates_the_key() -> TestResult {
        let keys = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&keys);
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .times(2)
            .returning(move |_, request| {
                if let Ok(mut keys) = seen.lock() {
                    keys.push(request.idempotency_key);
                }

                Err(unavailable())
            });

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let session = session()?;
        let mut cart = rice_cart()?;

        assert!(checkout.submit(&session, &mut cart, details(), YEAR).await.is_err());

        let item = cart.lines().first().map(|line| line.item_id);

        if let Some(item) = item {
            cart.increment(item)?;
        }

        assert!(checkout.submit(&session, &mut cart, details(), YEAR).await.is_err());

        let keys = keys.lock().map(|keys| keys.clone()).unwrap_or_default();

        assert_eq!(keys.len(), 2);
        assert_ne!(keys.first(), keys.last());

        Ok(())
    }

    #[tokio::test]
    async fn a_different_cart_never_reuses_a_failed_key() -> TestResult {
        let keys = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&keys);
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .times(2)
            .returning(move |_, request| {
                if let Ok(mut keys) = seen.lock() {
                    keys.push(request.idempotency_key);
                }

                Err(unavailable())
            });

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let session = session()?;

        let mut rice = rice_cart()?;

        assert!(checkout.submit(&session, &mut rice, details(), YEAR).await.is_err());

        let mut kottu = CartStore::new();

        kottu.add(
            CartItem {
                item_id: Uuid::now_v7(),
                name: "Kottu".to_string(),
                image_ref: None,
            },
            1,
            850,
        )?;

        assert_eq!(kottu.revision(), rice.revision());
        assert!(checkout.submit(&session, &mut kottu, details(), YEAR).await.is_err());

        let keys = keys.lock().map(|keys| keys.clone()).unwrap_or_default();

        assert_eq!(keys.len(), 2);
        assert_ne!(keys.first(), keys.last());

        Ok(())
    }

    #[tokio::test]
    async fn submit_now_checks_expiry_against_this_year() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment().never();

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let mut cart = rice_cart()?;
        let mut details = details();
        details.expiry_year = (current_year() - 1).to_string();

        let result = checkout.submit_now(&session()?, &mut cart, details).await;

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidPayment(PaymentValidationError {
                field: PaymentField::ExpiryYear,
                ..
            }))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_order_must_be_acknowledged_before_the_next() -> TestResult {
        let mut api = MockCheckoutApi::new();

        api.expect_save_payment()
            .times(2)
            .returning(|_, request| Ok(saved(request, 7)));

        let mut checkout = CheckoutOrchestrator::new(api, LKR);
        let session = session()?;
        let mut cart = rice_cart()?;

        checkout.submit(&session, &mut cart, details(), YEAR).await?;

        let mut next = rice_cart()?;

        assert!(matches!(
            checkout.submit(&session, &mut next, details(), YEAR).await,
            Err(CheckoutError::AlreadyConfirmed)
        ));

        checkout.start_new_order();

        assert_eq!(checkout.state(), CheckoutState::Editing);
        assert!(checkout.receipt().is_none());

        checkout.submit(&session, &mut next, details(), YEAR).await?;

        Ok(())
    }
}
