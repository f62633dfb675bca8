//! Password hashing.
//!
//! bcrypt is deliberately slow, so hashing and verification run on the
//! blocking thread pool.

use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};
use zeroize::Zeroizing;

/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failed")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    Join(#[from] JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns an error when the cost is out of range or the task panics.
    pub async fn hash(&self, password: Zeroizing<String>) -> Result<String, PasswordError> {
        let cost = self.cost;

        let hash = spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost)).await??;

        Ok(hash)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored hash is malformed or the task panics.
    pub async fn verify(
        &self,
        password: Zeroizing<String>,
        hash: String,
    ) -> Result<bool, PasswordError> {
        let matches = spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash)).await??;

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify_accepts_the_same_password() -> TestResult {
        let hasher = PasswordHasher::new(TEST_COST);

        let hash = hasher.hash(Zeroizing::new("pw123456".to_string())).await?;

        assert!(hash.starts_with("$2"));
        assert!(
            hasher
                .verify(Zeroizing::new("pw123456".to_string()), hash.clone())
                .await?
        );
        assert!(
            !hasher
                .verify(Zeroizing::new("pw1234567".to_string()), hash)
                .await?
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new(TEST_COST);

        let result = hasher
            .verify(Zeroizing::new("pw123456".to_string()), "nope".to_string())
            .await;

        assert!(result.is_err());
    }
}
