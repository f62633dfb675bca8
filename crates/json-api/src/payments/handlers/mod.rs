//! Payment Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_app::domain::payments::records::{Customer, PaymentItemRecord, PaymentRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.uuid.into(),
            username: customer.username,
            email: customer.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentItemResponse {
    pub food_name: String,
    pub quantity: u32,
    pub price: u64,
}

impl From<PaymentItemRecord> for PaymentItemResponse {
    fn from(item: PaymentItemRecord) -> Self {
        PaymentItemResponse {
            food_name: item.food_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Card summary. The full number is never stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentInfoResponse {
    pub card_type: String,
    pub card_name: String,
    pub last4: String,

    /// `MM/YYYY`
    pub expiration_date: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentResponse {
    pub id: Uuid,
    pub token_number: u64,

    /// Last three digits of the token number, for calling out at the counter
    pub short_code: String,

    pub user: CustomerResponse,
    pub cart_items: Vec<PaymentItemResponse>,
    pub total_price: u64,
    pub payment_info: PaymentInfoResponse,
    pub idempotency_key: Option<Uuid>,
    pub created_at: String,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        PaymentResponse {
            id: payment.uuid.into(),
            token_number: payment.token_number.get(),
            short_code: payment.token_number.short_code(),
            user: payment.customer.into(),
            cart_items: payment.items.into_iter().map(Into::into).collect(),
            total_price: payment.total_price,
            payment_info: PaymentInfoResponse {
                card_type: payment.card.card_type,
                card_name: payment.card.name_on_card,
                last4: payment.card.last4,
                expiration_date: payment.card.expiry,
            },
            idempotency_key: payment.idempotency_key,
            created_at: payment.created_at.to_string(),
        }
    }
}
