//! Receipt
//!
//! What the confirmation screen shows, built from the payment the server
//! persisted rather than from the local cart.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tiffin::{pricing::line_total, tokens::TokenNumber};

use crate::api::{Payment, PaymentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// The amount does not fit the money type.
    #[error("amount is too large to display")]
    Overflow,
}

/// One ordered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,

    /// Unit price in minor units.
    pub unit_price: u64,
}

impl From<PaymentItem> for ReceiptLine {
    fn from(item: PaymentItem) -> Self {
        ReceiptLine {
            name: item.food_name,
            quantity: item.quantity,
            unit_price: item.price,
        }
    }
}

/// Confirmed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    token_number: TokenNumber,
    lines: Vec<ReceiptLine>,
    total: u64,
    card_type: String,
    card_last4: String,
    placed_at: Timestamp,
    currency: &'static Currency,
}

impl Receipt {
    #[must_use]
    pub fn from_payment(payment: Payment, currency: &'static Currency) -> Self {
        Self {
            token_number: payment.token_number,
            lines: payment.cart_items.into_iter().map(Into::into).collect(),
            total: payment.total_price,
            card_type: payment.payment_info.card_type,
            card_last4: payment.payment_info.last4,
            placed_at: payment.created_at,
            currency,
        }
    }

    #[must_use]
    pub fn token_number(&self) -> TokenNumber {
        self.token_number
    }

    /// Three digit code to call the order out by.
    #[must_use]
    pub fn short_code(&self) -> String {
        self.token_number.short_code()
    }

    /// When the server recorded the payment.
    #[must_use]
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Card used, e.g. `Visa •••• 1234`.
    #[must_use]
    pub fn card(&self) -> String {
        format!("{} •••• {}", self.card_type, self.card_last4)
    }

    /// Amount paid.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Overflow`] for totals beyond `i64::MAX` minor
    /// units.
    pub fn total(&self) -> Result<Money<'static, Currency>, ReceiptError> {
        self.money(self.total)
    }

    /// Price of one line.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Overflow`] when the line total cannot be
    /// represented.
    pub fn line_total(&self, line: &ReceiptLine) -> Result<Money<'static, Currency>, ReceiptError> {
        let minor =
            line_total(line.unit_price, line.quantity).map_err(|_overflow| ReceiptError::Overflow)?;

        self.money(minor)
    }

    fn money(&self, minor: u64) -> Result<Money<'static, Currency>, ReceiptError> {
        let minor = i64::try_from(minor).map_err(|_overflow| ReceiptError::Overflow)?;

        Ok(Money::from_minor(minor, self.currency))
    }
}
