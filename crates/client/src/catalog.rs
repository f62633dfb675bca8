//! Catalog Fetcher

use tracing::debug;

use crate::{
    api::{ApiError, CatalogApi, FoodItem},
    liveness::Liveness,
};

/// Loads the menu. Nothing is cached; every call hits the server.
#[derive(Debug)]
pub struct CatalogFetcher<A> {
    api: A,
}

impl<A: CatalogApi> CatalogFetcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The current menu.
    ///
    /// # Errors
    ///
    /// Returns the API error when the menu cannot be loaded.
    pub async fn fetch(&self) -> Result<Vec<FoodItem>, ApiError> {
        self.api.list_foods().await
    }

    /// Like [`fetch`](Self::fetch), but yields `None` when the requesting view
    /// has gone away, whatever the outcome of the request.
    ///
    /// # Errors
    ///
    /// Returns the API error when the menu cannot be loaded and the view is
    /// still alive.
    pub async fn fetch_guarded(
        &self,
        liveness: &Liveness,
    ) -> Result<Option<Vec<FoodItem>>, ApiError> {
        let result = self.fetch().await;

        if !liveness.is_alive() {
            debug!("discarding catalog response for a closed view");

            return Ok(None);
        }

        result.map(Some)
    }
}
