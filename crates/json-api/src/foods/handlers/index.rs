//! List Foods Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_app::domain::foods::records::FoodRecord;

use crate::{extensions::*, foods::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FoodResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,

    /// Unit price in minor units
    pub price: u64,

    pub image_ref: Option<String>,
}

impl From<FoodRecord> for FoodResponse {
    fn from(food: FoodRecord) -> Self {
        FoodResponse {
            id: food.uuid.into(),
            name: food.name,
            description: food.description,
            category: food.category,
            price: food.price,
            image_ref: food.image_ref,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FoodsResponse {
    pub food_items: Vec<FoodResponse>,
}

/// List Foods Handler
///
/// Returns the whole catalog, grouped by category.
#[endpoint(tags("foods"), summary = "List Foods")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<FoodsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let foods = state
        .app
        .foods
        .list_foods()
        .await
        .map_err(into_status_error)?;

    Ok(Json(FoodsResponse {
        food_items: foods.into_iter().map(Into::into).collect(),
    }))
}
