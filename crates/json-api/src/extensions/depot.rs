//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};
use tiffin_app::auth::AuthenticatedUser;

const PRINCIPAL_DEPOT_KEY: &str = "principal";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: AuthenticatedUser);

    /// The authenticated caller, or 401 when the auth middleware did not run.
    fn principal_or_401(&self) -> Result<AuthenticatedUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: AuthenticatedUser) {
        self.insert(PRINCIPAL_DEPOT_KEY, principal);
    }

    fn principal_or_401(&self) -> Result<AuthenticatedUser, StatusError> {
        self.get::<AuthenticatedUser>(PRINCIPAL_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
