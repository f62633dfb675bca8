//! Payment Records

use jiff::Timestamp;
use tiffin::{payment::MaskedCard, tokens::TokenNumber};
use uuid::Uuid;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// The user a payment belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
}

/// Snapshot of an ordered line at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentItemRecord {
    pub food_name: String,
    pub quantity: u32,
    pub price: u64,
}

/// Payment Record. Immutable once written.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub token_number: TokenNumber,
    pub customer: Customer,
    pub items: Vec<PaymentItemRecord>,
    pub total_price: u64,
    pub card: MaskedCard,
    pub idempotency_key: Option<Uuid>,
    pub created_at: Timestamp,
}

/// Result of saving a payment.
#[derive(Debug, Clone)]
pub struct SavedPayment {
    pub payment: PaymentRecord,

    /// `true` when the idempotency key matched an earlier payment and nothing
    /// new was written.
    pub replayed: bool,
}
