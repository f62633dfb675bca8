//! Foods Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    amounts::{price_to_i64, try_get_amount},
    foods::{
        data::NewFood,
        records::{FoodRecord, FoodUuid},
    },
};

const LIST_FOODS_SQL: &str = include_str!("sql/list_foods.sql");
const GET_FOOD_SQL: &str = include_str!("sql/get_food.sql");
const CREATE_FOOD_SQL: &str = include_str!("sql/create_food.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFoodsRepository;

impl PgFoodsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_foods(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<FoodRecord>, sqlx::Error> {
        query_as::<Postgres, FoodRecord>(LIST_FOODS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_food(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        food: FoodUuid,
    ) -> Result<FoodRecord, sqlx::Error> {
        query_as::<Postgres, FoodRecord>(GET_FOOD_SQL)
            .bind(food.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_food(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        food: NewFood,
    ) -> Result<FoodRecord, sqlx::Error> {
        query_as::<Postgres, FoodRecord>(CREATE_FOOD_SQL)
            .bind(food.uuid.into_uuid())
            .bind(food.name)
            .bind(food.description)
            .bind(food.category)
            .bind(price_to_i64(food.price)?)
            .bind(food.image_ref)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for FoodRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: FoodUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            price: try_get_amount(row, "price")?,
            image_ref: row.try_get("image_ref")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
