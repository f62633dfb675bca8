//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tiffin::pricing::total_price;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        foods::records::FoodUuid,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut cart: CartRecord,
    ) -> Result<CartRecord, CartsServiceError> {
        cart.items = self.items_repository.get_cart_items(tx, cart.uuid).await?;
        cart.total_price = total_price(&cart.items)?;

        Ok(cart)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        self.items_repository
            .upsert_cart_item(&mut tx, cart.uuid, &item)
            .await?;

        let cart = self.with_items(&mut tx, cart).await?;

        tx.commit().await?;

        debug!(
            cart_uuid = %cart.uuid,
            food_uuid = %item.food_uuid,
            quantity = item.quantity,
            "added item to cart"
        );

        Ok(cart)
    }

    async fn set_quantity(
        &self,
        user: UserUuid,
        food: FoodUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.find_cart_by_user(&mut tx, user).await?;

        let changed = if quantity == 0 {
            self.items_repository
                .delete_cart_item(&mut tx, cart.uuid, food)
                .await?
        } else {
            self.items_repository
                .update_cart_item_quantity(&mut tx, cart.uuid, food, quantity)
                .await?
        };

        if changed == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let cart = self.with_items(&mut tx, cart).await?;

        tx.commit().await?;

        debug!(
            cart_uuid = %cart.uuid,
            food_uuid = %food,
            quantity,
            "set cart item quantity"
        );

        Ok(cart)
    }

    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.find_cart_by_user(&mut tx, user).await?;
        let cart = self.with_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository
            .delete_cart_by_user(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a food to the user's cart, creating the cart on first use.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Overwrite the quantity of a food already in the user's cart. Zero
    /// removes the line; the cart itself stays, possibly empty.
    async fn set_quantity(
        &self,
        user: UserUuid,
        food: FoodUuid,
        quantity: u32,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Retrieve the user's cart with its items expanded.
    async fn get_cart(&self, user: UserUuid) -> Result<CartRecord, CartsServiceError>;

    /// Remove the user's cart. Clearing a missing cart is not an error.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::carts::records::CartItemUuid, test::TestContext};

    use super::*;

    fn line(food: FoodUuid, quantity: u32, price: u64) -> NewCartItem {
        NewCartItem {
            uuid: CartItemUuid::new(),
            food_uuid: food,
            quantity,
            price,
        }
    }

    #[tokio::test]
    async fn adding_the_same_food_twice_sums_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("alice").await;
        let food = ctx.create_food("Rice", 500).await;

        ctx.carts.add_item(user.uuid, line(food.uuid, 2, 500)).await?;

        let cart = ctx.carts.add_item(user.uuid, line(food.uuid, 1, 500)).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|item| item.quantity), Some(3));
        assert_eq!(cart.total_price, 1_500);

        Ok(())
    }

    #[tokio::test]
    async fn latest_price_wins() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("bob").await;
        let food = ctx.create_food("Kottu", 800).await;

        ctx.carts.add_item(user.uuid, line(food.uuid, 1, 800)).await?;

        let cart = ctx.carts.add_item(user.uuid, line(food.uuid, 1, 850)).await?;

        assert_eq!(cart.items.first().map(|item| item.price), Some(850));
        assert_eq!(cart.total_price, 1_700);

        Ok(())
    }

    #[tokio::test]
    async fn items_are_expanded_with_food_details_in_insertion_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("carol").await;
        let tea = ctx.create_food("Tea", 100).await;
        let roti = ctx.create_food("Roti", 60).await;

        ctx.carts.add_item(user.uuid, line(tea.uuid, 2, 100)).await?;
        ctx.carts.add_item(user.uuid, line(roti.uuid, 5, 60)).await?;

        let cart = ctx.carts.get_cart(user.uuid).await?;

        let names: Vec<&str> = cart.items.iter().map(|item| item.name.as_str()).collect();

        assert_eq!(names, vec!["Tea", "Roti"]);
        assert_eq!(cart.total_price, 500);
        assert_eq!(cart.user_uuid, user.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("dave").await;
        let food = ctx.create_food("Rice", 300).await;

        let result = ctx.carts.add_item(user.uuid, line(food.uuid, 0, 300)).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_food_is_an_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("erin").await;

        let result = ctx
            .carts
            .add_item(user.uuid, line(FoodUuid::new(), 1, 300))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_overwrites_and_is_visible_on_get() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("kim").await;
        let rice = ctx.create_food("Rice", 300).await;
        let tea = ctx.create_food("Tea", 100).await;

        ctx.carts.add_item(user.uuid, line(rice.uuid, 3, 300)).await?;
        ctx.carts.add_item(user.uuid, line(tea.uuid, 1, 100)).await?;

        let cart = ctx.carts.set_quantity(user.uuid, rice.uuid, 2).await?;

        assert_eq!(cart.total_price, 700);

        let cart = ctx.carts.get_cart(user.uuid).await?;

        assert_eq!(
            cart.items
                .iter()
                .find(|item| item.food_uuid == rice.uuid)
                .map(|item| item.quantity),
            Some(2)
        );
        assert_eq!(cart.total_price, 700);

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_removes_the_line_and_keeps_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("lena").await;
        let rice = ctx.create_food("Rice", 300).await;

        ctx.carts.add_item(user.uuid, line(rice.uuid, 1, 300)).await?;

        let cart = ctx.carts.set_quantity(user.uuid, rice.uuid, 0).await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.total_price, 0);

        let cart = ctx.carts.get_cart(user.uuid).await?;

        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_for_a_food_not_in_the_cart_is_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("mo").await;
        let rice = ctx.create_food("Rice", 300).await;
        let tea = ctx.create_food("Tea", 100).await;

        ctx.carts.add_item(user.uuid, line(rice.uuid, 1, 300)).await?;

        for quantity in [0, 4] {
            let result = ctx.carts.set_quantity(user.uuid, tea.uuid, quantity).await;

            assert!(
                matches!(result, Err(CartsServiceError::ItemNotFound)),
                "expected ItemNotFound for quantity {quantity}, got {result:?}"
            );
        }

        let cart = ctx.carts.get_cart(user.uuid).await?;

        assert_eq!(cart.total_price, 300);

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_without_cart_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("nina").await;
        let rice = ctx.create_food("Rice", 300).await;

        let result = ctx.carts.set_quantity(user.uuid, rice.uuid, 1).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_without_cart_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("frank").await;

        let result = ctx.carts.get_cart(user.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_removes_it() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("gina").await;
        let food = ctx.create_food("Rice", 300).await;

        ctx.carts.add_item(user.uuid, line(food.uuid, 1, 300)).await?;
        ctx.carts.clear_cart(user.uuid).await?;
        ctx.carts.clear_cart(user.uuid).await?;

        let result = ctx.carts.get_cart(user.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound after clearing, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_per_user() -> TestResult {
        let ctx = TestContext::new().await;
        let hana = ctx.create_user("hana").await;
        let ivan = ctx.create_user("ivan").await;
        let food = ctx.create_food("Rice", 300).await;

        ctx.carts.add_item(hana.uuid, line(food.uuid, 2, 300)).await?;

        let result = ctx.carts.get_cart(ivan.uuid).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for another user's cart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_do_not_lose_updates() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("jay").await;
        let food = ctx.create_food("Hoppers", 120).await;

        let user_uuid = user.uuid;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let carts = ctx.carts.clone();
                let item = line(food.uuid, 1, 120);

                tokio::spawn(async move { carts.add_item(user_uuid, item).await })
            })
            .collect();

        for handle in handles {
            handle.await??;
        }

        let cart = ctx.carts.get_cart(user.uuid).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|item| item.quantity), Some(8));
        assert_eq!(cart.total_price, 960);

        Ok(())
    }
}
