//! API Errors

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the Tiffin API.
///
/// Cheap to clone so the checkout flow can both return and remember it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request took longer than the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The server answered with a non-success status.
    #[error("{status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] Arc<reqwest::Error>),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(Arc::new(error))
        } else {
            Self::Transport(Arc::new(error))
        }
    }
}

impl ApiError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Transport(_) => true,
            Self::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Decode(_) => false,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// The session is missing, expired or revoked.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
