//! Auth data models.

use jiff::Timestamp;

use crate::domain::users::records::{Role, UserUuid};

/// Stored credentials used during login.
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub uuid: UserUuid,
    pub password_hash: String,
}

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether the caller may act on resources owned by `owner`.
    #[must_use]
    pub fn can_access(&self, owner: UserUuid) -> bool {
        self.user_uuid == owner || self.is_admin()
    }
}

/// A freshly issued session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_uuid: UserUuid,
    pub expires_at: Timestamp,
}
