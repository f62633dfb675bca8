//! Payments service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tiffin::pricing::PricingError;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("no payment found with this token number")]
    NotFound,

    #[error("invalid cartItems: must not be empty")]
    EmptyOrder,

    #[error("invalid totalPrice: expected {expected}, got {submitted}")]
    TotalMismatch { expected: u64, submitted: u64 },

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("order total is too large")]
    Overflow(#[from] PricingError),

    #[error("payment already exists")]
    AlreadyExists,

    /// The idempotency key belongs to an earlier payment with different
    /// items or total.
    #[error("idempotency key was already used for a different order")]
    IdempotencyConflict,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl PaymentsServiceError {
    pub(crate) const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
