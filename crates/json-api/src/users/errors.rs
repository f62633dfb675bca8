//! User Errors

use salvo::http::StatusError;
use tracing::error;

use tiffin_app::domain::users::UsersServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("A user with this email already exists")
        }
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        error @ (UsersServiceError::InvalidField { .. } | UsersServiceError::EmptyUpdate) => {
            StatusError::bad_request().brief(error.to_string())
        }
        UsersServiceError::MissingRequiredData | UsersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        UsersServiceError::Password(source) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => unavailable("user storage error", &source),
    }
}
