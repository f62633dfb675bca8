//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tiffin::pricing::PricingError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart is empty")]
    NotFound,

    #[error("invalid quantity: must be greater than zero")]
    InvalidQuantity,

    #[error("food is not in the cart")]
    ItemNotFound,

    #[error("food does not exist")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("cart total is too large")]
    Overflow(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

/// `numeric_value_out_of_range`, raised when a summed quantity overflows.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if matches!(error, Error::Encode(_)) {
            return Self::InvalidData;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        if database_error.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
            return Self::InvalidData;
        }

        match database_error.kind() {
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            ErrorKind::UniqueViolation | ErrorKind::Other | _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_means_no_cart() {
        assert!(matches!(
            CartsServiceError::from(Error::RowNotFound),
            CartsServiceError::NotFound
        ));
    }

    #[test]
    fn encode_failures_are_invalid_data() {
        let error = Error::Encode(Box::new(std::fmt::Error));

        assert!(matches!(
            CartsServiceError::from(error),
            CartsServiceError::InvalidData
        ));
    }
}
