//! Authentication

mod errors;
pub(crate) mod handlers;
pub(crate) mod middleware;

pub(crate) use errors::*;
pub(crate) use handlers::*;

/// Cookie mirroring the session token for browser clients.
pub(crate) const ACCESS_TOKEN_COOKIE: &str = "access_token";
