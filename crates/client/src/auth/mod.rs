//! Auth Holder
//!
//! Owns the signed-in session and mirrors it to a [`TokenStorage`]. The
//! token is opaque to the client: it is decoded only to learn the user id,
//! and its signature is never checked here.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

mod storage;

pub use storage::*;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("session token is malformed: {0}")]
    MalformedToken(#[source] jsonwebtoken::errors::Error),

    #[error("session token subject is not a user id")]
    InvalidSubject(#[source] uuid::Error),
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// A bearer token and the user it was issued to.
#[derive(Clone)]
pub struct Session {
    token: Zeroizing<String>,
    user_id: Uuid,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"**redacted**")
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Session {
    /// Read the user id out of a token without verifying it.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is not a JWT or its subject is not a
    /// UUID.
    pub fn from_token(token: String) -> Result<Self, AuthError> {
        let token = Zeroizing::new(token);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(AuthError::MalformedToken)?
            .claims;

        let user_id = claims.sub.parse().map_err(AuthError::InvalidSubject)?;

        Ok(Self { token, user_id })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

/// The current session, if any, kept in step with its storage.
#[derive(Debug)]
pub struct AuthHolder<S> {
    storage: S,
    session: Option<Session>,
}

impl<S: TokenStorage> AuthHolder<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Restore the stored session. A missing, unreadable or malformed token
    /// leaves the holder signed out.
    pub async fn load(&mut self) {
        let token = match self.storage.read().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no stored session token");

                return;
            }
            Err(error) => {
                warn!("failed to read session token: {error}");

                return;
            }
        };

        match Session::from_token(token) {
            Ok(session) => self.session = Some(session),
            Err(error) => warn!("ignoring stored session token: {error}"),
        }
    }

    /// Persist a freshly issued token and adopt it.
    ///
    /// # Errors
    ///
    /// Returns an error when the token cannot be decoded or stored; the
    /// current session is kept in either case.
    pub async fn save(&mut self, token: String) -> Result<(), AuthError> {
        let session = Session::from_token(token)?;

        self.storage.write(session.token()).await?;
        self.session = Some(session);

        Ok(())
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored token cannot be removed; the current
    /// session is kept.
    pub async fn clear(&mut self) -> Result<(), AuthError> {
        self.storage.delete().await?;
        self.session = None;

        Ok(())
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::token)
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(Session::user_id)
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}
