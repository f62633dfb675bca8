//! Auth repository.

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    auth::{AuthenticatedUser, models::Credentials},
    domain::users::{records::UserUuid, repository::try_get_role},
};

const FIND_CREDENTIALS_BY_EMAIL_SQL: &str = include_str!("sql/find_credentials_by_email.sql");
const FIND_PRINCIPAL_SQL: &str = include_str!("sql/find_principal.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, sqlx::Error> {
        query_as::<Postgres, Credentials>(FIND_CREDENTIALS_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn find_principal(
        &self,
        user: UserUuid,
    ) -> Result<Option<AuthenticatedUser>, sqlx::Error> {
        query_as::<Postgres, AuthenticatedUser>(FIND_PRINCIPAL_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Credentials {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AuthenticatedUser {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            role: try_get_role(row, "role")?,
        })
    }
}
