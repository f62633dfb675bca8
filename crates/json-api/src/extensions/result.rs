//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Brief returned with every 503.
pub(crate) const UNAVAILABLE_BRIEF: &str = "Service temporarily unavailable, please retry";

/// Map any error to a logged HTTP error.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }
}

/// Log a storage failure and build the retryable 503 response.
pub(crate) fn unavailable(context: &str, source: &dyn Display) -> StatusError {
    error!("{context}: {source}");

    StatusError::service_unavailable().brief(UNAVAILABLE_BRIEF)
}
