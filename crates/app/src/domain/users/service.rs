//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::PasswordHasher,
    database::Db,
    domain::users::{
        data::{MIN_PASSWORD_CHARS, NewUser, ProfileUpdate},
        errors::UsersServiceError,
        records::{Role, UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    hasher: PasswordHasher,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db, hasher: PasswordHasher) -> Self {
        Self {
            db,
            hasher,
            repository: PgUsersRepository::new(),
        }
    }
}

fn validate_new_user(user: &NewUser) -> Result<(), UsersServiceError> {
    if user.username.trim().is_empty() {
        return Err(UsersServiceError::InvalidField {
            field: "username",
            reason: "is required",
        });
    }

    let email = user.email.trim();

    if email.is_empty() {
        return Err(UsersServiceError::InvalidField {
            field: "email",
            reason: "is required",
        });
    }

    if !email.contains('@') {
        return Err(UsersServiceError::InvalidField {
            field: "email",
            reason: "must be an email address",
        });
    }

    if user.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(UsersServiceError::InvalidField {
            field: "password",
            reason: "must be at least 8 characters",
        });
    }

    Ok(())
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        validate_new_user(&user)?;

        let password_hash = self.hasher.hash(user.password).await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                user.uuid,
                user.username.trim(),
                user.email.trim(),
                &password_hash,
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %created.uuid, "registered user");

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        if update.is_empty() {
            return Err(UsersServiceError::EmptyUpdate);
        }

        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_profile(&mut tx, user, update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.set_role(&mut tx, email.trim(), role).await?;

        tx.commit().await?;

        info!(user_uuid = %updated.uuid, %role, "changed user role");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create a user with a hashed password.
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Apply `update`: kept fields are untouched, cleared fields become
    /// empty and set fields are overwritten.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Change the role of the user registered under `email`.
    async fn set_role(&self, email: &str, role: Role) -> Result<UserRecord, UsersServiceError>;
}
