//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use tiffin_app::auth::AuthServiceError;

use crate::extensions::*;

/// Brief for every authentication failure, so callers can't tell which check
/// failed.
pub(crate) const UNAUTHENTICATED_BRIEF: &str = "Invalid or expired token";

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::Unauthenticated => {
            StatusError::unauthorized().brief(UNAUTHENTICATED_BRIEF)
        }
        AuthServiceError::Sql(source) => unavailable("failed to authenticate", &source),
        AuthServiceError::Password(source) => {
            error!("failed to verify password: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to issue session token: {source}");

            StatusError::internal_server_error()
        }
    }
}
