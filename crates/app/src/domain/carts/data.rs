//! Cart Data

use crate::domain::{carts::records::CartItemUuid, foods::records::FoodUuid};

/// New Cart Item Data
///
/// Adding a food that is already in the cart adds to its quantity and
/// replaces its price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub food_uuid: FoodUuid,
    pub quantity: u32,
    pub price: u64,
}
