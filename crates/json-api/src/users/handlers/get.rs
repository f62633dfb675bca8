//! Get User Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_app::domain::users::records::{UserRecord, UserUuid};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, handlers::ensure_self},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,

    /// Either `customer` or `admin`
    pub role: String,

    pub name: Option<String>,
    pub gender: Option<String>,

    /// ISO 8601 date, `YYYY-MM-DD`
    pub date_of_birth: Option<String>,

    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        let profile = user.profile;

        UserResponse {
            id: user.uuid.into(),
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            name: profile.name,
            gender: profile.gender,
            date_of_birth: profile.date_of_birth.as_ref().map(ToString::to_string),
            address: profile.address,
            contact_number: profile.contact_number,
            profile_picture: profile.profile_picture,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

/// Get User Handler
///
/// Returns the caller's own profile.
#[endpoint(
    tags("users"),
    summary = "Get User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let user: UserUuid = user.into_inner().into();

    ensure_self(principal, user)?;

    let user = state
        .app
        .users
        .get_user(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
