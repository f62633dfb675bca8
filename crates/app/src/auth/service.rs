//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::{
    auth::{
        AuthServiceError, AuthenticatedUser, PasswordHasher, Session, SessionKeys,
        repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    hasher: PasswordHasher,
    keys: SessionKeys,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: &Db, hasher: PasswordHasher, keys: SessionKeys) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
            hasher,
            keys,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn login(
        &self,
        email: &str,
        password: Zeroizing<String>,
    ) -> Result<Session, AuthServiceError> {
        let Some(credentials) = self
            .repository
            .find_credentials_by_email(email.trim())
            .await?
        else {
            debug!("login for unknown email");

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify(password, credentials.password_hash)
            .await?
        {
            debug!(user_uuid = %credentials.uuid, "login with wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        let session = self
            .keys
            .issue(credentials.uuid, Timestamp::now())
            .map_err(AuthServiceError::Token)?;

        info!(user_uuid = %session.user_uuid, "issued session");

        Ok(session)
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let user = self.keys.verify(bearer_token).map_err(|error| {
            debug!(%error, "rejected bearer token");

            AuthServiceError::Unauthenticated
        })?;

        self.repository
            .find_principal(user)
            .await?
            .ok_or(AuthServiceError::Unauthenticated)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify an email and password and issue a session token.
    async fn login(
        &self,
        email: &str,
        password: Zeroizing<String>,
    ) -> Result<Session, AuthServiceError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::{DEFAULT_SESSION_TTL_SECONDS, SessionKeys},
        domain::users::records::{Role, UserUuid},
        test::{TEST_PASSWORD, TestContext},
    };

    use super::*;

    fn password(value: &str) -> Zeroizing<String> {
        Zeroizing::new(value.to_string())
    }

    #[tokio::test]
    async fn login_issues_token_for_registered_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("alice").await;

        let session = ctx.auth.login(&user.email, password(TEST_PASSWORD)).await?;

        assert_eq!(session.user_uuid, user.uuid);

        let principal = ctx.auth.authenticate_bearer(&session.token).await?;

        assert_eq!(principal.user_uuid, user.uuid);
        assert_eq!(principal.role, Role::Customer);

        Ok(())
    }

    #[tokio::test]
    async fn login_email_is_case_insensitive() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("bob").await;

        let session = ctx
            .auth
            .login(&user.email.to_uppercase(), password(TEST_PASSWORD))
            .await?;

        assert_eq!(session.user_uuid, user.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("carol").await;

        let wrong_password = ctx.auth.login(&user.email, password("not-the-one")).await;
        let unknown_email = ctx
            .auth
            .login("nobody@example.com", password(TEST_PASSWORD))
            .await;

        assert!(
            matches!(wrong_password, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {wrong_password:?}"
        );
        assert!(
            matches!(unknown_email, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {unknown_email:?}"
        );
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_unauthenticated() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("garbage").await;

        assert!(
            matches!(result, Err(AuthServiceError::Unauthenticated)),
            "expected Unauthenticated, got {result:?}"
        );
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_unauthenticated() -> TestResult {
        let ctx = TestContext::new().await;
        let keys = SessionKeys::new(
            crate::test::TEST_JWT_SECRET,
            None,
            DEFAULT_SESSION_TTL_SECONDS,
        )?;

        let session = keys.issue(UserUuid::new(), Timestamp::now())?;

        let result = ctx.auth.authenticate_bearer(&session.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::Unauthenticated)),
            "expected Unauthenticated, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn promoted_user_authenticates_as_admin() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_admin("dana").await;

        let session = ctx.auth.login(&user.email, password(TEST_PASSWORD)).await?;
        let principal = ctx.auth.authenticate_bearer(&session.token).await?;

        assert!(principal.is_admin());

        Ok(())
    }
}
