//! App Router

use salvo::Router;

use crate::{auth, carts, foods, payments, users};

/// Public routes plus the routes behind bearer authentication.
pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("register").post(users::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(Router::with_path("signout").post(auth::signout::handler))
        .push(Router::with_path("getAllFoods").get(foods::index::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("user/{user}")
                        .get(users::get::handler)
                        .put(users::update::handler),
                )
                .push(Router::with_path("addToCart").post(carts::create::handler))
                .push(Router::with_path("updateCart").post(carts::update::handler))
                .push(Router::with_path("getCart/{user}").get(carts::get::handler))
                .push(Router::with_path("savepayment").post(payments::create::handler))
                .push(
                    Router::with_path("getPaymentByTokenNumber").get(payments::get::handler),
                )
                .push(
                    Router::with_path("getAllPayments")
                        .hoop(auth::middleware::require_admin)
                        .get(payments::index::handler),
                ),
        )
}
