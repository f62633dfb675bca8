//! Payments service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tiffin::{
    payment::{MaskedCard, last_four},
    pricing::total_price,
    tokens::TokenNumber,
};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::PgCartsRepository,
        payments::{
            data::{NewPayment, PaymentCard},
            errors::PaymentsServiceError,
            records::{PaymentRecord, PaymentUuid, SavedPayment},
            repository::PgPaymentsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentsService {
    db: Db,
    repository: PgPaymentsRepository,
    carts_repository: PgCartsRepository,
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPaymentsRepository::new(),
            carts_repository: PgCartsRepository::new(),
        }
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut payments: Vec<PaymentRecord>,
    ) -> Result<Vec<PaymentRecord>, PaymentsServiceError> {
        let uuids: Vec<PaymentUuid> = payments.iter().map(|payment| payment.uuid).collect();

        let mut items: FxHashMap<PaymentUuid, Vec<_>> = FxHashMap::default();

        for row in self.repository.get_payment_items(tx, &uuids).await? {
            items.entry(row.payment_uuid).or_default().push(row.item);
        }

        for payment in &mut payments {
            payment.items = items.remove(&payment.uuid).unwrap_or_default();
        }

        Ok(payments)
    }

    async fn load_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentRecord,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        self.with_items(tx, vec![payment])
            .await?
            .pop()
            .ok_or(PaymentsServiceError::NotFound)
    }
}

/// Check the order against its submitted total and reduce the card to what
/// may be stored.
fn validate_payment(payment: &NewPayment) -> Result<MaskedCard, PaymentsServiceError> {
    if payment.items.is_empty() {
        return Err(PaymentsServiceError::EmptyOrder);
    }

    for item in &payment.items {
        if item.food_name.trim().is_empty() {
            return Err(PaymentsServiceError::invalid("foodName", "is required"));
        }

        if item.quantity == 0 {
            return Err(PaymentsServiceError::invalid(
                "quantity",
                "must be greater than zero",
            ));
        }
    }

    let expected = total_price(&payment.items)?;

    if expected != payment.total_price {
        return Err(PaymentsServiceError::TotalMismatch {
            expected,
            submitted: payment.total_price,
        });
    }

    mask_card(&payment.card)
}

fn mask_card(card: &PaymentCard) -> Result<MaskedCard, PaymentsServiceError> {
    let card_type = card.card_type.trim();

    if card_type.is_empty() {
        return Err(PaymentsServiceError::invalid("cardType", "is required"));
    }

    let name_on_card = card.name_on_card.trim();

    if name_on_card.is_empty() {
        return Err(PaymentsServiceError::invalid("cardName", "is required"));
    }

    let last4 = last_four(&card.card_number).ok_or(PaymentsServiceError::invalid(
        "cardNumber",
        "must contain at least four digits",
    ))?;

    Ok(MaskedCard {
        card_type: card_type.to_string(),
        name_on_card: name_on_card.to_string(),
        last4,
        expiry: normalize_expiration(&card.expiration_date)?,
    })
}

fn normalize_expiration(value: &str) -> Result<String, PaymentsServiceError> {
    let invalid = || PaymentsServiceError::invalid("expirationDate", "must be MM/YYYY");

    let (month, year) = value.trim().split_once('/').ok_or_else(invalid)?;

    let digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|byte| byte.is_ascii_digit())
    };

    if !digits(month, 2) || !matches!(month.parse::<u8>(), Ok(1..=12)) || !digits(year, 4) {
        return Err(invalid());
    }

    Ok(format!("{month}/{year}"))
}

/// Whether a stored payment holds exactly the submitted lines and total.
fn same_order(stored: &PaymentRecord, submitted: &NewPayment) -> bool {
    stored.total_price == submitted.total_price
        && stored.items.len() == submitted.items.len()
        && stored
            .items
            .iter()
            .zip(&submitted.items)
            .all(|(stored, submitted)| {
                stored.food_name == submitted.food_name
                    && stored.quantity == submitted.quantity
                    && stored.price == submitted.price
            })
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn save_payment(
        &self,
        payment: NewPayment,
    ) -> Result<SavedPayment, PaymentsServiceError> {
        let card = validate_payment(&payment)?;

        let mut tx = self.db.begin().await?;

        let inserted = self
            .repository
            .insert_payment(&mut tx, &payment, &card)
            .await?;

        let (uuid, replayed) = match (inserted, payment.idempotency_key) {
            (Some(uuid), _) => {
                for (position, item) in payment.items.iter().enumerate() {
                    self.repository
                        .insert_payment_item(&mut tx, uuid, position, item)
                        .await?;
                }

                self.carts_repository
                    .delete_cart_by_user(&mut tx, payment.user_uuid)
                    .await?;

                (uuid, false)
            }
            (None, Some(key)) => {
                let existing = self
                    .repository
                    .find_payment_by_idempotency_key(&mut tx, payment.user_uuid, key)
                    .await?;

                (existing, true)
            }
            (None, None) => return Err(PaymentsServiceError::AlreadyExists),
        };

        let record = self.repository.get_payment(&mut tx, uuid).await?;
        let record = self.load_payment(&mut tx, record).await?;

        if replayed && !same_order(&record, &payment) {
            warn!(
                payment_uuid = %record.uuid,
                "idempotency key reused for a different order"
            );

            return Err(PaymentsServiceError::IdempotencyConflict);
        }

        tx.commit().await?;

        info!(
            payment_uuid = %record.uuid,
            token_number = %record.token_number,
            replayed,
            "saved payment"
        );

        Ok(SavedPayment {
            payment: record,
            replayed,
        })
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let payments = self.repository.list_payments(&mut tx).await?;
        let payments = self.with_items(&mut tx, payments).await?;

        tx.commit().await?;

        Ok(payments)
    }

    async fn get_payment_by_token_number(
        &self,
        token_number: TokenNumber,
    ) -> Result<PaymentRecord, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let payment = self
            .repository
            .get_payment_by_token_number(&mut tx, token_number)
            .await?;
        let payment = self.load_payment(&mut tx, payment).await?;

        tx.commit().await?;

        Ok(payment)
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Record a checkout and clear the user's cart, or return the earlier
    /// payment for a repeated idempotency key. A repeated key carrying a
    /// different order is a conflict.
    async fn save_payment(&self, payment: NewPayment)
    -> Result<SavedPayment, PaymentsServiceError>;

    /// List every payment, oldest first.
    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, PaymentsServiceError>;

    /// Retrieve one payment by its token number.
    async fn get_payment_by_token_number(
        &self,
        token_number: TokenNumber,
    ) -> Result<PaymentRecord, PaymentsServiceError>;
}
