//! User Data

use std::fmt;

use jiff::civil::Date;
use zeroize::Zeroizing;

use crate::domain::users::records::UserUuid;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// New User Data
#[derive(Clone)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// One field of a [`ProfileUpdate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value alone.
    Keep,

    /// Set the field to `NULL`.
    Clear,

    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> FieldUpdate<T> {
    #[must_use]
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Convert a set value, keeping `Keep` and `Clear` as they are.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Clear => FieldUpdate::Clear,
            Self::Set(value) => FieldUpdate::Set(f(value)?),
        })
    }

    /// `(write, value)` as bound into the update statement.
    pub(crate) fn into_parts(self) -> (bool, Option<T>) {
        match self {
            Self::Keep => (false, None),
            Self::Clear => (true, None),
            Self::Set(value) => (true, Some(value)),
        }
    }
}

/// `None` keeps, `Some(None)` clears and `Some(Some(value))` sets.
impl<T> From<Option<Option<T>>> for FieldUpdate<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(value)) => Self::Set(value),
        }
    }
}

/// Profile Update Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: FieldUpdate<String>,
    pub gender: FieldUpdate<String>,
    pub date_of_birth: FieldUpdate<Date>,
    pub address: FieldUpdate<String>,
    pub contact_number: FieldUpdate<String>,
    pub profile_picture: FieldUpdate<String>,
}

impl ProfileUpdate {
    /// Whether every field is [`FieldUpdate::Keep`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_keep()
            && self.gender.is_keep()
            && self.date_of_birth.is_keep()
            && self.address.is_keep()
            && self.contact_number.is_keep()
            && self.profile_picture.is_keep()
    }
}
