//! Carts

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub(crate) use repositories::PgCartsRepository;
pub use service::*;
