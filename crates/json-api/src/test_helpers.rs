//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, http::header::SET_COOKIE, prelude::*};
use tiffin::{payment::MaskedCard, tokens::TokenNumber};
use tiffin_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid},
        },
        foods::{MockFoodsService, records::FoodUuid},
        payments::{
            MockPaymentsService,
            records::{Customer, PaymentItemRecord, PaymentRecord, PaymentUuid},
        },
        users::{
            MockUsersService,
            records::{Profile, Role, UserRecord, UserUuid},
        },
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: AuthenticatedUser = AuthenticatedUser {
    user_uuid: UserUuid::from_uuid(Uuid::from_u128(1)),
    role: Role::Customer,
};

pub(crate) const TEST_ADMIN: AuthenticatedUser = AuthenticatedUser {
    user_uuid: UserUuid::from_uuid(Uuid::from_u128(2)),
    role: Role::Admin,
};

/// One mock per service. Mocks without expectations fail on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub users: MockUsersService,
    pub auth: MockAuthService,
    pub foods: MockFoodsService,
    pub carts: MockCartsService,
    pub payments: MockPaymentsService,
}

impl From<Mocks> for AppContext {
    fn from(mocks: Mocks) -> Self {
        AppContext {
            users: Arc::new(mocks.users),
            auth: Arc::new(mocks.auth),
            foods: Arc::new(mocks.foods),
            carts: Arc::new(mocks.carts),
            payments: Arc::new(mocks.payments),
        }
    }
}

pub(crate) fn state_with(mocks: Mocks) -> Arc<State> {
    State::shared(mocks.into())
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// Route with no principal in the depot.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state_with(mocks))).push(route))
}

/// Route called as [`TEST_CUSTOMER`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Route called as [`TEST_ADMIN`].
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)))
            .hoop(inject_admin)
            .push(route),
    )
}

/// A cookie set on the response, rendered as its `Set-Cookie` value.
pub(crate) fn response_cookie(res: &Response, name: &str) -> Option<String> {
    res.cookie(name).map(ToString::to_string).or_else(|| {
        res.headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&format!("{name}=")))
            .map(str::to_owned)
    })
}

pub(crate) fn make_user(uuid: UserUuid, username: &str) -> UserRecord {
    UserRecord {
        uuid,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role: Role::Customer,
        profile: Profile::default(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(user: UserUuid, items: Vec<(FoodUuid, &str, u32, u64)>) -> CartRecord {
    let items: Vec<CartItemRecord> = items
        .into_iter()
        .map(|(food_uuid, name, quantity, price)| CartItemRecord {
            uuid: CartItemUuid::new(),
            food_uuid,
            name: name.to_string(),
            image_ref: None,
            quantity,
            price,
        })
        .collect();

    let total_price = items
        .iter()
        .map(|item| u64::from(item.quantity) * item.price)
        .sum();

    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: user,
        items,
        total_price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_payment(owner: UserUuid, token_number: u64) -> PaymentRecord {
    PaymentRecord {
        uuid: PaymentUuid::new(),
        token_number: TokenNumber::new(token_number),
        customer: Customer {
            uuid: owner,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        },
        items: vec![PaymentItemRecord {
            food_name: "Rice".to_string(),
            quantity: 2,
            price: 300,
        }],
        total_price: 600,
        card: MaskedCard {
            card_type: "Visa".to_string(),
            name_on_card: "Alice Perera".to_string(),
            last4: "1234".to_string(),
            expiry: "07/2030".to_string(),
        },
        idempotency_key: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
