//! Food Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Food UUID
pub type FoodUuid = TypedUuid<FoodRecord>;

/// Food Record
#[derive(Debug, Clone)]
pub struct FoodRecord {
    pub uuid: FoodUuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: u64,
    pub image_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
