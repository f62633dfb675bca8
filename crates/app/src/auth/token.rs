//! Session tokens.
//!
//! HS256 JWTs carrying `{sub, iat, exp}`. Tokens are signed with the current
//! secret; the previous secret, when configured, is still accepted for
//! verification so a rotation does not sign everybody out.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::Session, domain::users::records::UserUuid};

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Session lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3_600;

const LEEWAY_SECONDS: u64 = 5;

#[derive(Debug, Error)]
pub enum SessionKeyError {
    #[error("session signing secret must be at least {MIN_SECRET_BYTES} bytes")]
    SecretTooShort,

    #[error("session lifetime must be a positive number of seconds")]
    InvalidTtl,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token has expired")]
    Expired,

    #[error("session token signature does not verify")]
    BadSignature,

    #[error("session token is malformed")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("session token could not be signed")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("session expiry is out of range")]
    Time(#[source] jiff::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: Vec<DecodingKey>,
    validation: Validation,
    ttl: SignedDuration,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("keys", &self.decoding.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Build keys from the current secret and an optional previous secret.
    ///
    /// # Errors
    ///
    /// Returns an error when a secret is shorter than [`MIN_SECRET_BYTES`] or
    /// the lifetime is zero or too large.
    pub fn new(
        secret: &[u8],
        previous: Option<&[u8]>,
        ttl_seconds: u64,
    ) -> Result<Self, SessionKeyError> {
        if secret.len() < MIN_SECRET_BYTES
            || previous.is_some_and(|previous| previous.len() < MIN_SECRET_BYTES)
        {
            return Err(SessionKeyError::SecretTooShort);
        }

        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .filter(|ttl| *ttl > 0)
            .map(SignedDuration::from_secs)
            .ok_or(SessionKeyError::InvalidTtl)?;

        let mut decoding = vec![DecodingKey::from_secret(secret)];

        decoding.extend(previous.map(DecodingKey::from_secret));

        let mut validation = Validation::new(Algorithm::HS256);

        validation.leeway = LEEWAY_SECONDS;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding,
            validation,
            ttl,
        })
    }

    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Sign a session token for `user`, valid from `now` for the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the expiry overflows or signing fails.
    pub fn issue(&self, user: UserUuid, now: Timestamp) -> Result<Session, SessionTokenError> {
        let expires_at = now.checked_add(self.ttl).map_err(SessionTokenError::Time)?;

        let claims = Claims {
            sub: user.into_uuid(),
            iat: now.as_second(),
            exp: expires_at.as_second(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(SessionTokenError::Signing)?;

        Ok(Session {
            token,
            user_uuid: user,
            expires_at,
        })
    }

    /// Verify a token against every known key and return its subject.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is malformed, expired or signed with an
    /// unknown key.
    pub fn verify(&self, token: &str) -> Result<UserUuid, SessionTokenError> {
        for key in &self.decoding {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => return Ok(UserUuid::from_uuid(data.claims.sub)),
                Err(error) => match error.kind() {
                    ErrorKind::InvalidSignature => {}
                    ErrorKind::ExpiredSignature => return Err(SessionTokenError::Expired),
                    _ => return Err(SessionTokenError::Malformed(error)),
                },
            }
        }

        Err(SessionTokenError::BadSignature)
    }
}
