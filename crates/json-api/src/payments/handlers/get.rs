//! Get Payment Handler

use std::sync::Arc;

use salvo::prelude::*;

use tiffin::tokens::TokenNumber;

use crate::{
    extensions::*,
    payments::{errors::into_status_error, handlers::PaymentResponse},
    state::State,
};

/// Get Payment Handler
///
/// Looks a payment up by its token number. Customers only see their own.
#[endpoint(
    tags("payments"),
    summary = "Get Payment By Token Number",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed token number"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the caller's payment"),
        (status_code = StatusCode::NOT_FOUND, description = "No payment with this token number"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let token_number = req
        .query::<String>("tokenNumber")
        .ok_or_else(|| StatusError::bad_request().brief("tokenNumber is required"))?
        .parse::<TokenNumber>()
        .map_err(|_ignored| {
            StatusError::bad_request().brief("invalid tokenNumber: must be a positive integer")
        })?;

    let payment = state
        .app
        .payments
        .get_payment_by_token_number(token_number)
        .await
        .map_err(into_status_error)?;

    if !principal.can_access(payment.customer.uuid) {
        return Err(StatusError::forbidden().brief("You can only view your own payments"));
    }

    Ok(Json(payment.into()))
}
