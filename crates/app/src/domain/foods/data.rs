//! Food Data

use crate::domain::foods::records::FoodUuid;

/// New Food Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub uuid: FoodUuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: u64,
    pub image_ref: Option<String>,
}
