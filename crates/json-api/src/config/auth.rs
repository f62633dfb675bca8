//! Auth Config

use clap::Args;
use tiffin_app::auth::{
    DEFAULT_BCRYPT_COST, DEFAULT_SESSION_TTL_SECONDS, PasswordHasher, SessionKeyError,
    SessionKeys,
};

/// Session signing and password hashing settings.
#[derive(Args)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens, at least 32 bytes
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Previous signing secret, accepted for verification only while rotating
    #[arg(long, env = "JWT_PREVIOUS_SECRET", hide_env_values = true)]
    pub jwt_previous_secret: Option<String>,

    /// Session token lifetime in seconds
    #[arg(long, env = "JWT_TTL_SECONDS", default_value_t = DEFAULT_SESSION_TTL_SECONDS)]
    pub jwt_ttl_seconds: u64,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"**redacted**")
            .field(
                "jwt_previous_secret",
                &self.jwt_previous_secret.as_ref().map(|_| "**redacted**"),
            )
            .field("jwt_ttl_seconds", &self.jwt_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Build the session signing keys.
    ///
    /// # Errors
    ///
    /// Returns an error when a secret is too short or the TTL is invalid.
    pub fn session_keys(&self) -> Result<SessionKeys, SessionKeyError> {
        SessionKeys::new(
            self.jwt_secret.as_bytes(),
            self.jwt_previous_secret.as_deref().map(str::as_bytes),
            self.jwt_ttl_seconds,
        )
    }

    #[must_use]
    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_previous_secret: None,
            jwt_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            config("too-short").session_keys(),
            Err(SessionKeyError::SecretTooShort)
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let output = format!("{:?}", config("0123456789abcdef0123456789abcdef"));

        assert!(!output.contains("0123456789abcdef"), "secret leaked: {output}");
    }
}
