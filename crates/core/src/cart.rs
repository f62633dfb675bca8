//! Cart
//!
//! A single user's cart. Lines are unique per item id and always have a
//! positive quantity; the total is recomputed from the lines on every read.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::pricing::{Priced, PricingError, total_price};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Lines must hold at least one unit.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    /// No line exists for the given item.
    #[error("item {0} is not in the cart")]
    LineNotFound(Uuid),

    /// The mutation would push the cart total past `u64::MAX`.
    #[error("cart total would overflow")]
    Overflow(#[from] PricingError),
}

/// Catalog-facing description of an item that can be put in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog identifier.
    pub item_id: Uuid,

    /// Display name.
    pub name: String,

    /// Optional reference to the item's image.
    pub image_ref: Option<String>,
}

/// One item in the cart with its quantity and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog identifier, unique within a cart.
    pub item_id: Uuid,

    /// Display name.
    pub name: String,

    /// Price of a single unit, in minor units.
    pub unit_price: u64,

    /// Number of units, always positive.
    pub quantity: u32,

    /// Optional reference to the item's image.
    pub image_ref: Option<String>,
}

impl CartLine {
    /// Price of the whole line.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] when the line total does not fit in a `u64`.
    pub fn total(&self) -> Result<u64, PricingError> {
        crate::pricing::line_total(self.unit_price, self.quantity)
    }
}

impl Priced for CartLine {
    fn unit_price(&self) -> u64 {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart Store
///
/// Every successful mutation bumps [`CartStore::revision`]. A mutation that
/// would overflow the total is rejected and leaves the store untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
    revision: u64,
}

impl CartStore {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `item` at `price`.
    ///
    /// An existing line keeps its position, gains the quantity and takes the
    /// new price. Otherwise a line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity and
    /// [`CartError::Overflow`] if the quantity or total would overflow.
    pub fn add(&mut self, item: CartItem, quantity: u32, price: u64) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let mut lines = self.lines.clone();

        merge_line(
            &mut lines,
            CartLine {
                item_id: item.item_id,
                name: item.name,
                unit_price: price,
                quantity,
                image_ref: item.image_ref,
            },
        )?;

        self.commit(lines)
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown item and
    /// [`CartError::Overflow`] if the quantity or total would overflow.
    pub fn increment(&mut self, item_id: Uuid) -> Result<(), CartError> {
        let mut lines = self.lines.clone();

        let line = lines
            .iter_mut()
            .find(|line| line.item_id == item_id)
            .ok_or(CartError::LineNotFound(item_id))?;

        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or(CartError::Overflow(PricingError::Overflow))?;

        self.commit(lines)
    }

    /// Remove one unit from an existing line, dropping the line when it
    /// reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown item.
    pub fn decrement(&mut self, item_id: Uuid) -> Result<(), CartError> {
        let position = self.position(item_id)?;

        let remove = self
            .lines
            .get_mut(position)
            .map(|line| {
                line.quantity = line.quantity.saturating_sub(1);
                line.quantity == 0
            })
            .ok_or(CartError::LineNotFound(item_id))?;

        if remove {
            self.lines.remove(position);
        }

        self.revision += 1;

        Ok(())
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] for an unknown item.
    pub fn remove(&mut self, item_id: Uuid) -> Result<(), CartError> {
        let position = self.position(item_id)?;

        self.lines.remove(position);
        self.revision += 1;

        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if !self.lines.is_empty() {
            self.lines.clear();
            self.revision += 1;
        }
    }

    /// Replace every line, merging duplicate item ids the way [`CartStore::add`]
    /// does and dropping zero-quantity lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the merged lines would overflow.
    pub fn replace_lines<I>(&mut self, lines: I) -> Result<(), CartError>
    where
        I: IntoIterator<Item = CartLine>,
    {
        let mut merged = Vec::new();

        for line in lines.into_iter().filter(|line| line.quantity > 0) {
            merge_line(&mut merged, line)?;
        }

        if merged == self.lines {
            return Ok(());
        }

        self.commit(merged)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for a single item.
    pub fn line(&self, item_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Sum of `unit_price * quantity` over every line.
    pub fn total(&self) -> u64 {
        // Mutations reject any state whose total overflows.
        total_price(&self.lines).unwrap_or(u64::MAX)
    }

    /// Total number of units across all lines.
    pub fn units(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Counter bumped by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn position(&self, item_id: Uuid) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(CartError::LineNotFound(item_id))
    }

    fn commit(&mut self, lines: Vec<CartLine>) -> Result<(), CartError> {
        total_price(&lines)?;

        self.lines = lines;
        self.revision += 1;

        Ok(())
    }
}

fn merge_line(lines: &mut Vec<CartLine>, incoming: CartLine) -> Result<(), CartError> {
    match lines
        .iter_mut()
        .find(|line| line.item_id == incoming.item_id)
    {
        Some(existing) => {
            existing.quantity = existing
                .quantity
                .checked_add(incoming.quantity)
                .ok_or(CartError::Overflow(PricingError::Overflow))?;
            existing.unit_price = incoming.unit_price;
            existing.name = incoming.name;

            if incoming.image_ref.is_some() {
                existing.image_ref = incoming.image_ref;
            }
        }
        None => lines.push(incoming),
    }

    Ok(())
}
