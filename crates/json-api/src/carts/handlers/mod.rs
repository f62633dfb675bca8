//! Cart Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod update;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_app::domain::carts::records::{CartItemRecord, CartRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub image_ref: Option<String>,
    pub quantity: u32,

    /// Unit price in minor units
    pub price: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        CartItemResponse {
            id: item.uuid.into(),
            food_id: item.food_uuid.into(),
            name: item.name,
            image_ref: item.image_ref,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItemResponse>,
    pub total_price: u64,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            id: cart.uuid.into(),
            user_id: cart.user_uuid.into(),
            items: cart.items.into_iter().map(Into::into).collect(),
            total_price: cart.total_price,
        }
    }
}
