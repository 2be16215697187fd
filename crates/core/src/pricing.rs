//! Pricing

use thiserror::Error;

/// Errors raised while accumulating prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A line or running total did not fit in `u64` minor units.
    #[error("price total overflowed")]
    Overflow,

    /// The price a customer pays is higher than the undiscounted price.
    #[error("total cost {total_cost} exceeds base cost {base_cost}")]
    TotalExceedsBase {
        /// Undiscounted cost.
        base_cost: u64,
        /// Discounted cost.
        total_cost: u64,
    },
}

/// Catalog price of a single unit of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitPrice {
    /// Undiscounted price in minor units.
    pub base_cost: u64,

    /// Price after the catalog discount in minor units.
    pub total_cost: u64,

    /// Catalog discount in percent.
    pub discount: u8,
}

/// Aggregate prices of a cart or an order.
///
/// Only the base and total costs are stored; the discount is always derived from
/// them, so `total_discount() == total_base_cost() - total_cost()` holds for every
/// value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceTotals {
    base_cost: u64,
    total_cost: u64,
}

impl PriceTotals {
    /// Totals of an empty cart.
    pub const ZERO: Self = Self {
        base_cost: 0,
        total_cost: 0,
    };

    /// Build totals from already summed costs.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::TotalExceedsBase`] when `total_cost > base_cost`.
    pub const fn new(base_cost: u64, total_cost: u64) -> Result<Self, PricingError> {
        if total_cost > base_cost {
            return Err(PricingError::TotalExceedsBase {
                base_cost,
                total_cost,
            });
        }

        Ok(Self {
            base_cost,
            total_cost,
        })
    }

    /// Sum of undiscounted costs.
    pub const fn total_base_cost(&self) -> u64 {
        self.base_cost
    }

    /// Sum of the costs the customer pays.
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Difference between the base and the paid totals.
    pub const fn total_discount(&self) -> u64 {
        self.base_cost - self.total_cost
    }

    /// Add `quantity` units priced at `base_cost` / `total_cost` each.
    ///
    /// # Errors
    ///
    /// - [`PricingError::TotalExceedsBase`]: the unit total is above the unit base.
    /// - [`PricingError::Overflow`]: the line or running totals overflow.
    pub fn add_line(
        self,
        base_cost: u64,
        total_cost: u64,
        quantity: u64,
    ) -> Result<Self, PricingError> {
        if total_cost > base_cost {
            return Err(PricingError::TotalExceedsBase {
                base_cost,
                total_cost,
            });
        }

        let line_base = base_cost
            .checked_mul(quantity)
            .ok_or(PricingError::Overflow)?;

        let line_total = total_cost
            .checked_mul(quantity)
            .ok_or(PricingError::Overflow)?;

        Ok(Self {
            base_cost: self
                .base_cost
                .checked_add(line_base)
                .ok_or(PricingError::Overflow)?,
            total_cost: self
                .total_cost
                .checked_add(line_total)
                .ok_or(PricingError::Overflow)?,
        })
    }
}
