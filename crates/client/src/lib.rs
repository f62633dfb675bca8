//! Tiffin Client
//!
//! Everything a Tiffin front end needs besides its views: the signed-in
//! session, a typed client for the JSON API, catalog loading, reconciliation
//! of the local cart with the server cart and the checkout state machine.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod liveness;
pub mod receipt;
pub mod sync;
