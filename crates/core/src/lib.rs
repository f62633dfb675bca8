//! Tiffin
//!
//! Domain types shared by the Tiffin backend and client: the cart store,
//! price arithmetic, payment field validation and order token numbers.

pub mod cart;
pub mod payment;
pub mod pricing;
pub mod tokens;
