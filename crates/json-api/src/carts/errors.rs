//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use tiffin_app::domain::carts::CartsServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart is empty"),
        CartsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Food is not in the cart")
        }
        error @ CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief(error.to_string())
        }
        CartsServiceError::InvalidReference => {
            StatusError::bad_request().brief("invalid foodId: food does not exist")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart item")
        }
        CartsServiceError::Overflow(source) => {
            error!("cart total overflowed: {source}");

            StatusError::bad_request().brief("Cart total is too large")
        }
        CartsServiceError::Sql(source) => unavailable("cart storage error", &source),
    }
}
