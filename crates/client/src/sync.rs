//! Cart Sync
//!
//! The server cart is the source of truth. Local changes go to the server
//! first and the store is then overwritten with the cart the server returns.

use thiserror::Error;
use tiffin::{
    cart::{CartError, CartItem, CartStore},
    pricing::PricingError,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    api::{AddToCart, ApiError, CartApi, UpdateCart},
    auth::Session,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

#[derive(Debug)]
pub struct CartSync<A> {
    api: A,
}

impl<A: CartApi> CartSync<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Add `quantity` of `item` at `price` on the server, then mirror the
    /// server cart locally.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the server cart cannot be
    /// held locally. The store is left unchanged in either case.
    pub async fn add(
        &self,
        session: &Session,
        store: &mut CartStore,
        item: &CartItem,
        quantity: u32,
        price: u64,
    ) -> Result<(), SyncError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity.into());
        }

        let request = AddToCart {
            food_id: item.item_id,
            quantity,
            price,
        };

        let cart = self.api.add_to_cart(session.token(), &request).await?;

        store.replace_lines(cart.into_lines())?;

        Ok(())
    }

    /// Add one unit to the line for `item_id` on the server.
    ///
    /// # Errors
    ///
    /// As [`Self::set_quantity`], plus [`CartError::Overflow`] when the
    /// quantity is already at its maximum.
    pub async fn increment(
        &self,
        session: &Session,
        store: &mut CartStore,
        item_id: Uuid,
    ) -> Result<(), SyncError> {
        let quantity = local_quantity(store, item_id)?
            .checked_add(1)
            .ok_or(CartError::Overflow(PricingError::Overflow))?;

        self.set_quantity(session, store, item_id, quantity).await
    }

    /// Remove one unit from the line for `item_id` on the server. The line
    /// goes away when it reaches zero.
    ///
    /// # Errors
    ///
    /// As [`Self::set_quantity`].
    pub async fn decrement(
        &self,
        session: &Session,
        store: &mut CartStore,
        item_id: Uuid,
    ) -> Result<(), SyncError> {
        let quantity = local_quantity(store, item_id)?.saturating_sub(1);

        self.set_quantity(session, store, item_id, quantity).await
    }

    /// Remove the line for `item_id` on the server.
    ///
    /// # Errors
    ///
    /// As [`Self::set_quantity`].
    pub async fn remove(
        &self,
        session: &Session,
        store: &mut CartStore,
        item_id: Uuid,
    ) -> Result<(), SyncError> {
        self.set_quantity(session, store, item_id, 0).await
    }

    /// Overwrite the quantity of an existing line on the server, then mirror
    /// the server cart locally. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when the store has no line for
    /// `item_id`, or the API error. The store is left unchanged on error.
    pub async fn set_quantity(
        &self,
        session: &Session,
        store: &mut CartStore,
        item_id: Uuid,
        quantity: u32,
    ) -> Result<(), SyncError> {
        local_quantity(store, item_id)?;

        let update = UpdateCart {
            food_id: item_id,
            quantity,
        };

        let cart = self.api.update_cart(session.token(), &update).await?;

        store.replace_lines(cart.into_lines())?;

        Ok(())
    }

    /// Replace the store with the server cart. A missing server cart empties
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails for any other reason.
    pub async fn refresh(&self, session: &Session, store: &mut CartStore) -> Result<(), SyncError> {
        match self.api.get_cart(session.token(), session.user_id()).await {
            Ok(cart) => store.replace_lines(cart.into_lines())?,
            Err(error) if error.is_not_found() => {
                debug!("server cart is empty");

                store.clear();
            }
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }
}

fn local_quantity(store: &CartStore, item_id: Uuid) -> Result<u32, CartError> {
    store
        .line(item_id)
        .map(|line| line.quantity)
        .ok_or(CartError::LineNotFound(item_id))
}
