//! Cart Records

use jiff::Timestamp;
use tiffin::pricing::Priced;

use crate::{
    domain::{foods::records::FoodUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// `total_price` is recomputed from `items` whenever the cart is loaded.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
    pub total_price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record, expanded with the food's display details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub food_uuid: FoodUuid,
    pub name: String,
    pub image_ref: Option<String>,
    pub quantity: u32,
    pub price: u64,
}

impl Priced for CartItemRecord {
    fn unit_price(&self) -> u64 {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}
