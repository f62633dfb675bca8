//! Food Errors

use salvo::http::StatusError;
use tracing::error;

use tiffin_app::domain::foods::FoodsServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: FoodsServiceError) -> StatusError {
    match error {
        FoodsServiceError::NotFound => StatusError::not_found().brief("Food not found"),
        FoodsServiceError::AlreadyExists => StatusError::conflict(),
        FoodsServiceError::MissingRequiredData | FoodsServiceError::InvalidData => {
            StatusError::bad_request()
        }
        FoodsServiceError::InvalidPrice(source) => {
            error!("stored food price out of range: {source}");

            StatusError::internal_server_error()
        }
        FoodsServiceError::Sql(source) => unavailable("food storage error", &source),
    }
}
