//! Payment Data

use std::fmt;

use tiffin::pricing::Priced;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{payments::records::PaymentUuid, users::records::UserUuid};

/// One line of the order as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentItem {
    pub food_name: String,
    pub quantity: u32,
    pub price: u64,
}

impl Priced for NewPaymentItem {
    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Card details as submitted. Only the last four digits of `card_number` are
/// ever stored.
#[derive(Clone)]
pub struct PaymentCard {
    pub card_type: String,
    pub name_on_card: String,
    pub card_number: Zeroizing<String>,

    /// `MM/YYYY`
    pub expiration_date: String,
}

impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCard")
            .field("card_type", &self.card_type)
            .field("name_on_card", &self.name_on_card)
            .field("card_number", &"**redacted**")
            .field("expiration_date", &self.expiration_date)
            .finish()
    }
}

/// New Payment Data
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<NewPaymentItem>,
    pub total_price: u64,
    pub card: PaymentCard,

    /// Client generated key identifying one checkout attempt. Resubmitting
    /// with the same key returns the original payment.
    pub idempotency_key: Option<Uuid>,
}
