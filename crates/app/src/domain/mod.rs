//! Tiffin Domain Concerns

pub(crate) mod amounts;
pub mod carts;
pub mod foods;
pub mod payments;
pub mod users;
