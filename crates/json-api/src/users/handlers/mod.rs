//! User Handlers

pub(crate) mod get;
pub(crate) mod register;
pub(crate) mod update;

use salvo::prelude::StatusError;
use tiffin_app::{auth::AuthenticatedUser, domain::users::records::UserUuid};

/// Profiles are only visible to their owner.
pub(crate) fn ensure_self(
    principal: AuthenticatedUser,
    user: UserUuid,
) -> Result<(), StatusError> {
    if principal.user_uuid == user {
        Ok(())
    } else {
        Err(StatusError::forbidden().brief("You can only access your own account"))
    }
}
