//! Pricing
//!
//! All amounts are integer minor units. Arithmetic is checked; an overflow is
//! reported as an error rather than wrapping or saturating.

use thiserror::Error;

/// Errors raised while computing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The computed amount does not fit in a `u64`.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Something with a unit price and a quantity.
pub trait Priced {
    /// Price of a single unit, in minor units.
    fn unit_price(&self) -> u64;

    /// Number of units.
    fn quantity(&self) -> u32;
}

/// Price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a `u64`.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, PricingError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of `unit_price * quantity` over every line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line total or the running sum
/// does not fit in a `u64`.
pub fn total_price<'a, P, I>(lines: I) -> Result<u64, PricingError>
where
    P: Priced + 'a,
    I: IntoIterator<Item = &'a P>,
{
    lines.into_iter().try_fold(0_u64, |total, line| {
        total
            .checked_add(line_total(line.unit_price(), line.quantity())?)
            .ok_or(PricingError::Overflow)
    })
}
