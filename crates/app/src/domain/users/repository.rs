//! Users Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::users::{
    data::ProfileUpdate,
    records::{Profile, Role, UserRecord, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const UPDATE_PROFILE_SQL: &str = include_str!("sql/update_profile.sql");
const SET_ROLE_SQL: &str = include_str!("sql/set_role.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(uuid.into_uuid())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, sqlx::Error> {
        let (write_name, name) = update.name.into_parts();
        let (write_gender, gender) = update.gender.into_parts();
        let (write_date_of_birth, date_of_birth) = update.date_of_birth.into_parts();
        let (write_address, address) = update.address.into_parts();
        let (write_contact_number, contact_number) = update.contact_number.into_parts();
        let (write_profile_picture, profile_picture) = update.profile_picture.into_parts();

        query_as::<Postgres, UserRecord>(UPDATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(write_name)
            .bind(name)
            .bind(write_gender)
            .bind(gender)
            .bind(write_date_of_birth)
            .bind(date_of_birth.map(SqlxDate::from))
            .bind(write_address)
            .bind(address)
            .bind(write_contact_number)
            .bind(contact_number)
            .bind(write_profile_picture)
            .bind(profile_picture)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        role: Role,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(SET_ROLE_SQL)
            .bind(email)
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

pub(crate) fn try_get_role(row: &PgRow, col: &str) -> Result<Role, sqlx::Error> {
    let role: String = row.try_get(col)?;

    role.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            role: try_get_role(row, "role")?,
            profile: Profile {
                name: row.try_get("name")?,
                gender: row.try_get("gender")?,
                date_of_birth: row
                    .try_get::<Option<SqlxDate>, _>("date_of_birth")?
                    .map(SqlxDate::to_jiff),
                address: row.try_get("address")?,
                contact_number: row.try_get("contact_number")?,
                profile_picture: row.try_get("profile_picture")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
