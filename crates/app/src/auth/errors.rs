//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{PasswordError, SessionTokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, expired or unverifiable token, or the user is gone.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("password verification error")]
    Password(#[from] PasswordError),

    #[error("session token error")]
    Token(#[source] SessionTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
