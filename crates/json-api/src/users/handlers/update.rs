//! Update User Handler

use std::sync::Arc;

use jiff::civil::Date;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use tiffin_app::domain::users::{
    data::{FieldUpdate, ProfileUpdate},
    records::UserUuid,
};

use crate::{
    extensions::*,
    state::State,
    users::{
        errors::into_status_error,
        handlers::{ensure_self, get::UserResponse},
    },
};

/// Update User Request
///
/// Omitted fields are left unchanged and `null` clears a field. Fields outside
/// the profile are ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub name: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub gender: Option<Option<String>>,

    /// ISO 8601 date, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub date_of_birth: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub address: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub contact_number: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub profile_picture: Option<Option<String>>,
}

/// A field that is present, even as `null`, deserializes to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateUserRequest> for ProfileUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateUserRequest) -> Result<Self, Self::Error> {
        let date_of_birth = FieldUpdate::from(request.date_of_birth)
            .try_map(|value| value.parse::<Date>())
            .map_err(|_ignored| {
                StatusError::bad_request().brief("invalid dateOfBirth: expected YYYY-MM-DD")
            })?;

        Ok(ProfileUpdate {
            name: request.name.into(),
            gender: request.gender.into(),
            date_of_birth,
            address: request.address.into(),
            contact_number: request.contact_number.into(),
            profile_picture: request.profile_picture.into(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Update User Handler
#[endpoint(
    tags("users"),
    summary = "Update User",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    name = "users.update",
    skip(user, json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserUpdatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let user: UserUuid = user.into_inner().into();

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    ensure_self(principal, user)?;

    let update = ProfileUpdate::try_from(json.into_inner())?;

    let user = state
        .app
        .users
        .update_profile(user, update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UserUpdatedResponse {
        message: "Updated successfully".to_string(),
        user: user.into(),
    }))
}
