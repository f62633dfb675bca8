//! Payment
//!
//! Card details entered at checkout. The full card number and CVV only live in
//! [`PaymentDetails`], which wipes them on drop; everything that leaves the
//! client goes through [`MaskedCard`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

/// Payment form fields, in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentField {
    /// Card network or type, e.g. "Visa".
    CardType,
    /// Cardholder name.
    NameOnCard,
    /// Primary account number.
    CardNumber,
    /// Two digit expiry month.
    ExpiryMonth,
    /// Four digit expiry year.
    ExpiryYear,
    /// Card verification value.
    Cvv,
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CardType => "card type",
            Self::NameOnCard => "name on card",
            Self::CardNumber => "card number",
            Self::ExpiryMonth => "expiry month",
            Self::ExpiryYear => "expiry year",
            Self::Cvv => "CVV",
        };

        f.write_str(name)
    }
}

/// The first payment field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct PaymentValidationError {
    /// Offending field.
    pub field: PaymentField,

    /// Human readable reason.
    pub reason: &'static str,
}

impl PaymentValidationError {
    fn new(field: PaymentField, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Card details as typed by the user.
///
/// Secrets are wiped when the value is dropped and never appear in `Debug`
/// output.
#[derive(Clone, Default)]
pub struct PaymentDetails {
    /// Card network or type.
    pub card_type: String,

    /// Cardholder name.
    pub name_on_card: String,

    /// Full card number.
    pub card_number: String,

    /// Expiry month, `MM`.
    pub expiry_month: String,

    /// Expiry year, `YYYY`.
    pub expiry_year: String,

    /// Card verification value.
    pub cvv: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_type", &self.card_type)
            .field("name_on_card", &self.name_on_card)
            .field("card_number", &"<redacted>")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"<redacted>")
            .finish()
    }
}

impl Drop for PaymentDetails {
    fn drop(&mut self) {
        self.card_number.zeroize();
        self.cvv.zeroize();
    }
}

impl PaymentDetails {
    /// Validate every field and produce the card summary that may be sent to
    /// the backend.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, checked in [`PaymentField`] order.
    pub fn validate(&self, current_year: i32) -> Result<MaskedCard, PaymentValidationError> {
        let card_type = required(PaymentField::CardType, &self.card_type)?;
        let name_on_card = required(PaymentField::NameOnCard, &self.name_on_card)?;

        let card_number = required(PaymentField::CardNumber, &self.card_number)?;

        if !is_digits(card_number, 16) {
            return Err(PaymentValidationError::new(
                PaymentField::CardNumber,
                "must be exactly 16 digits",
            ));
        }

        let month = required(PaymentField::ExpiryMonth, &self.expiry_month)?;

        if !is_digits(month, 2) || !matches!(month.parse::<u8>(), Ok(1..=12)) {
            return Err(PaymentValidationError::new(
                PaymentField::ExpiryMonth,
                "must be two digits between 01 and 12",
            ));
        }

        let year = required(PaymentField::ExpiryYear, &self.expiry_year)?;

        if !is_digits(year, 4) {
            return Err(PaymentValidationError::new(
                PaymentField::ExpiryYear,
                "must be four digits",
            ));
        }

        if !year.parse::<i32>().is_ok_and(|year| year >= current_year) {
            return Err(PaymentValidationError::new(
                PaymentField::ExpiryYear,
                "card has expired",
            ));
        }

        let cvv = required(PaymentField::Cvv, &self.cvv)?;

        if !is_digits(cvv, 3) {
            return Err(PaymentValidationError::new(
                PaymentField::Cvv,
                "must be exactly 3 digits",
            ));
        }

        let last4 = last_four(card_number).ok_or_else(|| {
            PaymentValidationError::new(PaymentField::CardNumber, "must be exactly 16 digits")
        })?;

        Ok(MaskedCard {
            card_type: card_type.to_string(),
            name_on_card: name_on_card.to_string(),
            last4,
            expiry: format!("{month}/{year}"),
        })
    }
}

/// Card summary safe to transmit and persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedCard {
    /// Card network or type.
    pub card_type: String,

    /// Cardholder name.
    pub name_on_card: String,

    /// Last four digits of the card number.
    pub last4: String,

    /// Expiry as `MM/YYYY`.
    pub expiry: String,
}

/// Last four digits of a card number, ignoring separators.
///
/// Returns `None` when fewer than four digits are present.
pub fn last_four(card_number: &str) -> Option<String> {
    let digits: Vec<char> = card_number.chars().filter(char::is_ascii_digit).collect();

    let start = digits.len().checked_sub(4)?;

    digits.get(start..).map(|tail| tail.iter().collect())
}

fn required(field: PaymentField, value: &str) -> Result<&str, PaymentValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(PaymentValidationError::new(field, "is required"));
    }

    Ok(value)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}
