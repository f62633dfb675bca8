//! Login Handler

use std::{fmt, sync::Arc};

use salvo::{
    http::cookie::{Cookie, SameSite},
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    auth::{ACCESS_TOKEN_COOKIE, into_status_error},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    pub user_id: Uuid,

    /// When the token stops being accepted, RFC 3339
    pub expires_at: String,

    pub message: String,
}

/// Login Handler
///
/// Exchanges an email and password for a session token. The token is also set
/// as an HTTP-only cookie.
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Storage unavailable"),
    ),
)]
#[tracing::instrument(name = "auth.login", skip_all, fields(user_uuid = tracing::field::Empty), err)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let LoginRequest { email, password } = json.into_inner();

    let session = state
        .app
        .auth
        .login(&email, Zeroizing::new(password))
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("user_uuid", tracing::field::display(session.user_uuid));

    res.add_cookie(
        Cookie::build((ACCESS_TOKEN_COOKIE, session.token.clone()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .path("/")
            .build(),
    );

    tracing::info!("user logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        user_id: session.user_uuid.into_uuid(),
        expires_at: session.expires_at.to_string(),
        message: "Login successful".to_string(),
    }))
}
