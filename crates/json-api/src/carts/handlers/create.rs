//! Add To Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_app::domain::carts::{CartsServiceError, data::NewCartItem, records::CartItemUuid};

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Add To Cart Request
///
/// Signed so that zero and negative values reach validation instead of
/// failing deserialization.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartRequest {
    pub food_id: Uuid,
    pub quantity: i64,

    /// Unit price in minor units
    pub price: i64,
}

impl TryFrom<AddToCartRequest> for NewCartItem {
    type Error = StatusError;

    fn try_from(request: AddToCartRequest) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(request.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| {
                StatusError::bad_request().brief(CartsServiceError::InvalidQuantity.to_string())
            })?;

        let price = u64::try_from(request.price).map_err(|_ignored| {
            StatusError::bad_request().brief("invalid price: must not be negative")
        })?;

        Ok(NewCartItem {
            uuid: CartItemUuid::new(),
            food_uuid: request.food_id.into(),
            quantity,
            price,
        })
    }
}

/// Add To Cart Handler
///
/// Adds to the quantity when the food is already in the cart.
#[endpoint(
    tags("carts"),
    summary = "Add To Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart with the item added"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
    ),
)]
#[tracing::instrument(
    name = "carts.add_item",
    skip(json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        food_uuid = tracing::field::Empty,
        quantity = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddToCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let item = NewCartItem::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));
    span.record("food_uuid", tracing::field::display(item.food_uuid));
    span.record("quantity", item.quantity);

    let cart = state
        .app
        .carts
        .add_item(principal.user_uuid, item)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
