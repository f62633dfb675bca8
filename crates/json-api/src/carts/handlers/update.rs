//! Update Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Request
///
/// `quantity` replaces the current quantity; zero removes the line.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCartRequest {
    pub food_id: Uuid,
    pub quantity: i64,
}

/// Update Cart Handler
///
/// Sets the quantity of a food already in the caller's cart.
#[endpoint(
    tags("carts"),
    summary = "Update Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart after the change"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "No cart or food not in it"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.set_quantity",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        food_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let quantity = u32::try_from(request.quantity).map_err(|_ignored| {
        StatusError::bad_request().brief("invalid quantity: must not be negative")
    })?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));
    span.record("food_uuid", tracing::field::display(request.food_id));
    span.record("quantity", quantity);

    let cart = state
        .app
        .carts
        .set_quantity(principal.user_uuid, request.food_id.into(), quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
