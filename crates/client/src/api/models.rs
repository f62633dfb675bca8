//! API Models
//!
//! Wire shapes of the JSON API, camelCase on the wire.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tiffin::{
    cart::{CartItem, CartLine},
    tokens::TokenNumber,
};
use uuid::Uuid;

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,

    /// Unit price in minor units.
    pub price: u64,

    pub image_ref: Option<String>,
}

impl FoodItem {
    /// What the cart needs to know about this dish.
    #[must_use]
    pub fn cart_item(&self) -> CartItem {
        CartItem {
            item_id: self.id,
            name: self.name.clone(),
            image_ref: self.image_ref.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FoodsEnvelope {
    pub food_items: Vec<FoodItem>,
}

/// Body of `POST /addToCart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub food_id: Uuid,
    pub quantity: u32,
    pub price: u64,
}

/// Body of `POST /updateCart`. A zero quantity removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCart {
    pub food_id: Uuid,
    pub quantity: u32,
}

/// The authoritative cart held by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<ServerCartItem>,
    pub total_price: u64,
}

impl ServerCart {
    /// Lines in the shape the local cart store keeps.
    pub fn into_lines(self) -> impl Iterator<Item = CartLine> {
        self.items.into_iter().map(Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCartItem {
    pub id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub image_ref: Option<String>,
    pub quantity: u32,
    pub price: u64,
}

impl From<ServerCartItem> for CartLine {
    fn from(item: ServerCartItem) -> Self {
        CartLine {
            item_id: item.food_id,
            name: item.name,
            unit_price: item.price,
            quantity: item.quantity,
            image_ref: item.image_ref,
        }
    }
}

/// One ordered line, as sent at checkout and echoed back on the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    pub food_name: String,
    pub quantity: u32,
    pub price: u64,
}

impl From<&CartLine> for PaymentItem {
    fn from(line: &CartLine) -> Self {
        PaymentItem {
            food_name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
        }
    }
}

/// Card summary sent at checkout. `card_number` holds only the last four
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub card_type: String,
    pub card_name: String,
    pub card_number: String,

    /// `MM/YYYY`
    pub expiration_date: String,
}

/// Body of `POST /savepayment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayment {
    pub cart_items: Vec<PaymentItem>,
    pub total_price: u64,
    pub payment_info: PaymentInfo,
    pub idempotency_key: Uuid,
}

/// Stored card summary on a payment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPaymentInfo {
    pub card_type: String,
    pub card_name: String,
    pub last4: String,
    pub expiration_date: String,
}

/// A payment as persisted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub token_number: TokenNumber,
    pub short_code: String,
    pub cart_items: Vec<PaymentItem>,
    pub total_price: u64,
    pub payment_info: StoredPaymentInfo,
    pub idempotency_key: Option<Uuid>,
    pub created_at: Timestamp,
}

/// Response of `POST /savepayment`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentSaved {
    pub message: String,
    pub payment: Payment,
}

/// Error body rendered by the server for non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub brief: String,
}
