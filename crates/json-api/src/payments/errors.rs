//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use tiffin_app::domain::payments::PaymentsServiceError;

use crate::extensions::*;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => {
            StatusError::not_found().brief("No payment found with this token number")
        }
        error @ (PaymentsServiceError::EmptyOrder
        | PaymentsServiceError::TotalMismatch { .. }
        | PaymentsServiceError::InvalidField { .. }) => {
            StatusError::bad_request().brief(error.to_string())
        }
        PaymentsServiceError::Overflow(_) => {
            StatusError::bad_request().brief("Order total is too large")
        }
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Idempotency key already used")
        }
        PaymentsServiceError::IdempotencyConflict => {
            StatusError::conflict().brief("Idempotency key already used for a different order")
        }
        PaymentsServiceError::InvalidReference => {
            error!("payment references a missing user");

            StatusError::unauthorized()
        }
        PaymentsServiceError::MissingRequiredData | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Sql(source) => unavailable("payment storage error", &source),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn total_mismatch_reports_both_amounts() {
        let status = into_status_error(PaymentsServiceError::TotalMismatch {
            expected: 600,
            submitted: 500,
        });

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "invalid totalPrice: expected 600, got 500");
    }

    #[test]
    fn reused_key_for_another_order_is_a_conflict() {
        let status = into_status_error(PaymentsServiceError::IdempotencyConflict);

        assert_eq!(status.code, StatusCode::CONFLICT);
        assert_eq!(status.brief, "Idempotency key already used for a different order");
    }

    #[test]
    fn storage_errors_are_retryable() {
        let status = into_status_error(PaymentsServiceError::Sql(sqlx::Error::PoolTimedOut));

        assert_eq!(status.code, StatusCode::SERVICE_UNAVAILABLE);
    }
}
