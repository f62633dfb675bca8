//! Save Payment Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use tiffin_app::domain::{
    payments::{
        data::{NewPayment, NewPaymentItem, PaymentCard},
        records::PaymentUuid,
    },
    users::records::UserUuid,
};

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, observe_checkout},
    payments::{errors::into_status_error, handlers::PaymentResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentItemRequest {
    pub food_name: String,
    pub quantity: i64,
    pub price: i64,
}

/// Card details. `securityCode` is accepted for compatibility and dropped.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentInfoRequest {
    pub card_type: String,
    pub card_name: String,
    pub card_number: String,

    /// `MM/YYYY`
    pub expiration_date: String,
}

impl fmt::Debug for PaymentInfoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentInfoRequest")
            .field("card_type", &self.card_type)
            .field("card_name", &self.card_name)
            .field("card_number", &"**redacted**")
            .field("expiration_date", &self.expiration_date)
            .finish()
    }
}

/// Save Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SavePaymentRequest {
    pub cart_items: Vec<PaymentItemRequest>,
    pub total_price: i64,
    pub payment_info: PaymentInfoRequest,

    /// Reusing a key with the same order returns the payment first saved with
    /// it; reusing it for a different order is rejected with 409.
    pub idempotency_key: Option<Uuid>,
}

impl SavePaymentRequest {
    fn into_new_payment(self, user: UserUuid) -> Result<NewPayment, StatusError> {
        let items = self
            .cart_items
            .into_iter()
            .map(|item| {
                Ok(NewPaymentItem {
                    food_name: item.food_name,
                    quantity: non_negative(item.quantity, "quantity")?,
                    price: non_negative(item.price, "price")?,
                })
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        let info = self.payment_info;

        Ok(NewPayment {
            uuid: PaymentUuid::new(),
            user_uuid: user,
            items,
            total_price: non_negative(self.total_price, "totalPrice")?,
            card: PaymentCard {
                card_type: info.card_type,
                name_on_card: info.card_name,
                card_number: Zeroizing::new(info.card_number),
                expiration_date: info.expiration_date,
            },
            idempotency_key: self.idempotency_key,
        })
    }
}

fn non_negative<T: TryFrom<i64>>(value: i64, field: &str) -> Result<T, StatusError> {
    T::try_from(value).map_err(|_ignored| {
        StatusError::bad_request().brief(format!("invalid {field}: must not be negative"))
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentSavedResponse {
    pub message: String,
    pub payment: PaymentResponse,
}

/// Save Payment Handler
///
/// Records the order, assigns its token number and empties the caller's cart.
/// A repeated idempotency key returns the original payment with 200, or 409
/// when the order differs from the one first saved with that key.
#[endpoint(
    tags("payments"),
    summary = "Save Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Payment saved"),
        (status_code = StatusCode::OK, description = "Payment replayed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Idempotency key reused"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
    ),
)]
#[tracing::instrument(
    name = "payments.save",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        token_number = tracing::field::Empty,
        replayed = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<SavePaymentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PaymentSavedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));

    let payment = json
        .into_inner()
        .into_new_payment(principal.user_uuid)
        .inspect_err(|_error| observe_checkout(CheckoutOutcome::Rejected))?;

    let saved = state
        .app
        .payments
        .save_payment(payment)
        .await
        .inspect_err(|_error| observe_checkout(CheckoutOutcome::Rejected))
        .map_err(into_status_error)?;

    span.record("token_number", saved.payment.token_number.get());
    span.record("replayed", saved.replayed);

    if saved.replayed {
        observe_checkout(CheckoutOutcome::Replayed);
        res.status_code(StatusCode::OK);
    } else {
        observe_checkout(CheckoutOutcome::Created);
        res.status_code(StatusCode::CREATED);
    }

    Ok(Json(PaymentSavedResponse {
        message: "Payment successful".to_string(),
        payment: saved.payment.into(),
    }))
}
