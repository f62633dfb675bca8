//! Foods service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::foods::{
        data::NewFood,
        errors::FoodsServiceError,
        records::{FoodRecord, FoodUuid},
        repository::PgFoodsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgFoodsService {
    db: Db,
    repository: PgFoodsRepository,
}

impl PgFoodsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgFoodsRepository::new(),
        }
    }
}

#[async_trait]
impl FoodsService for PgFoodsService {
    async fn list_foods(&self) -> Result<Vec<FoodRecord>, FoodsServiceError> {
        let mut tx = self.db.begin().await?;

        let foods = self.repository.list_foods(&mut tx).await?;

        tx.commit().await?;

        Ok(foods)
    }

    async fn get_food(&self, food: FoodUuid) -> Result<FoodRecord, FoodsServiceError> {
        let mut tx = self.db.begin().await?;

        let food = self.repository.get_food(&mut tx, food).await?;

        tx.commit().await?;

        Ok(food)
    }

    async fn create_food(&self, food: NewFood) -> Result<FoodRecord, FoodsServiceError> {
        i64::try_from(food.price)?;

        if food.name.trim().is_empty() {
            return Err(FoodsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_food(&mut tx, food).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait FoodsService: Send + Sync {
    /// List every purchasable food.
    async fn list_foods(&self) -> Result<Vec<FoodRecord>, FoodsServiceError>;

    /// Retrieve a single food.
    async fn get_food(&self, food: FoodUuid) -> Result<FoodRecord, FoodsServiceError>;

    /// Add a food to the catalog.
    async fn create_food(&self, food: NewFood) -> Result<FoodRecord, FoodsServiceError>;
}
