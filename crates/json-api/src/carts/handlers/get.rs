//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tiffin_app::domain::users::records::UserUuid;

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's cart with each item's food details.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the caller's cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart is empty"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let user: UserUuid = user.into_inner().into();

    if principal.user_uuid != user {
        return Err(StatusError::forbidden().brief("You can only view your own cart"));
    }

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tiffin_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        foods::records::FoodUuid,
    };

    use crate::test_helpers::{Mocks, TEST_ADMIN, TEST_CUSTOMER, customer_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        customer_service(
            Mocks {
                carts,
                ..Mocks::default()
            },
            Router::with_path("getCart/{user}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_cart_returns_items() -> TestResult {
        let mut carts = MockCartsService::new();
        let uuid = TEST_CUSTOMER.user_uuid;
        let rice = FoodUuid::new();
        let dhal = FoodUuid::new();

        carts
            .expect_get_cart()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |user| {
                Ok(make_cart(user, vec![(rice, "Rice", 2, 300), (dhal, "Dhal", 1, 250)]))
            });

        let mut res = TestClient::get(format!("http://example.com/getCart/{uuid}"))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.total_price, 850);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::NotFound));

        let mut res = TestClient::get(format!(
            "http://example.com/getCart/{}",
            TEST_CUSTOMER.user_uuid
        ))
        .send(&make_service(carts))
        .await;

        let body = res.take_string().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert!(body.contains("Cart is empty"), "{body}");

        Ok(())
    }

    #[tokio::test]
    async fn test_other_users_cart_returns_403() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_cart().never();

        let res = TestClient::get(format!("http://example.com/getCart/{}", TEST_ADMIN.user_uuid))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
