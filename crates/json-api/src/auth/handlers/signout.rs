//! Sign Out Handler

use salvo::{
    http::cookie::Cookie,
    oapi::ToSchema,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::auth::ACCESS_TOKEN_COOKIE;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignedOutResponse {
    pub message: String,
}

/// Sign Out Handler
///
/// Expires the session cookie. Bearer tokens stay valid until they expire;
/// clients drop their copy.
#[endpoint(tags("auth"), summary = "Sign Out")]
pub(crate) async fn handler(res: &mut Response) -> Json<SignedOutResponse> {
    let mut cookie = Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").build();

    cookie.make_removal();

    res.add_cookie(cookie);

    Json(SignedOutResponse {
        message: "User has been signed out".to_string(),
    })
}
