//! Promo Codes
//!
//! A promo code carries a single sale percentage and applies to the products whose
//! promo group contains it. Whether a product belongs to the group is decided per
//! product by the store; this module holds the arithmetic and the aggregate policy
//! shared by checkout and the standalone promo preview.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::pricing::{PriceTotals, PricingError};

/// Longest accepted promo code.
pub const MAX_PROMO_CODE_LEN: usize = 30;

/// Errors specific to promo codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromotionError {
    /// The code is empty or longer than [`MAX_PROMO_CODE_LEN`] characters.
    #[error("promo code must be 1-{MAX_PROMO_CODE_LEN} characters")]
    InvalidCode,

    /// A stored sale percentage is outside `1..=100`.
    #[error("sale percentage {0} is out of range")]
    InvalidSale(i64),

    /// None of the priced products is in the promo group.
    #[error("no product is in the promo group")]
    ProductNotInPromo,

    /// Percentage arithmetic could not be represented in minor units.
    #[error("percentage conversion overflowed")]
    PercentConversion,

    /// Errors bubbled up from totals accumulation.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A syntactically valid promo code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromoCode(String);

impl PromoCode {
    /// Validate a raw code. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidCode`] for empty or overlong codes.
    pub fn parse(code: &str) -> Result<Self, PromotionError> {
        let code = code.trim();
        let len = code.chars().count();

        if len == 0 || len > MAX_PROMO_CODE_LEN {
            return Err(PromotionError::InvalidCode);
        }

        Ok(Self(code.to_string()))
    }

    /// The code as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PromoCode {
    type Err = PromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sale percentage of a promo code, in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePercent(u8);

impl SalePercent {
    /// Decode a stored sale value. `None` and zero mean the product is not in the
    /// promo group.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidSale`] for negative values or values above 100.
    pub fn from_stored(value: Option<i64>) -> Result<Option<Self>, PromotionError> {
        match value {
            None | Some(0) => Ok(None),
            Some(stored) => match u8::try_from(stored) {
                Ok(percent @ 1..=100) => Ok(Some(Self(percent))),
                _ => Err(PromotionError::InvalidSale(stored)),
            },
        }
    }

    /// The percentage value.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Apply the sale to a cost: `round(cost * (1 - percent / 100))`, halves rounded
    /// away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::PercentConversion`] if the result cannot be
    /// represented in `u64` minor units.
    pub fn apply(self, cost: u64) -> Result<u64, PromotionError> {
        let keep = Decimal::ONE_HUNDRED - Decimal::from(self.0);

        Decimal::from(cost)
            .checked_mul(keep)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(PromotionError::PercentConversion)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .ok_or(PromotionError::PercentConversion)
    }
}

/// Price of one product under a promo code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoPrice {
    /// The product is in the promo group; `total_cost` has the sale applied.
    Discounted {
        /// Undiscounted unit cost.
        base_cost: u64,
        /// Unit cost after the promo sale.
        total_cost: u64,
    },

    /// The product is not in the promo group; costs are the catalog ones.
    NotEligible {
        /// Undiscounted unit cost.
        base_cost: u64,
        /// Catalog unit cost.
        total_cost: u64,
    },
}

impl PromoPrice {
    /// Price a product from its catalog costs and the sale it gets from the code.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::PercentConversion`] if the sale cannot be applied.
    pub fn for_product(
        base_cost: u64,
        total_cost: u64,
        sale: Option<SalePercent>,
    ) -> Result<Self, PromotionError> {
        let Some(sale) = sale else {
            return Ok(Self::NotEligible {
                base_cost,
                total_cost,
            });
        };

        Ok(Self::Discounted {
            base_cost,
            total_cost: sale.apply(total_cost)?,
        })
    }

    /// Whether the product is in the promo group.
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Discounted { .. })
    }

    /// Undiscounted unit cost.
    pub const fn base_cost(&self) -> u64 {
        match self {
            Self::Discounted { base_cost, .. } | Self::NotEligible { base_cost, .. } => *base_cost,
        }
    }

    /// Unit cost the customer pays under the code.
    pub const fn total_cost(&self) -> u64 {
        match self {
            Self::Discounted { total_cost, .. } | Self::NotEligible { total_cost, .. } => {
                *total_cost
            }
        }
    }
}

/// Running totals of a promo code applied to a set of products.
///
/// Every product contributes to the totals, discounted when eligible and at catalog
/// price otherwise. Finishing fails when no product was eligible at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromoApplication {
    totals: PriceTotals,
    eligible: usize,
}

impl PromoApplication {
    /// Start an empty application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a priced product.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] when the totals overflow.
    pub fn add(self, price: PromoPrice, quantity: u64) -> Result<Self, PricingError> {
        let totals = self
            .totals
            .add_line(price.base_cost(), price.total_cost(), quantity)?;

        Ok(Self {
            totals,
            eligible: self.eligible + usize::from(price.is_eligible()),
        })
    }

    /// Number of products that were in the promo group.
    pub const fn eligible(&self) -> usize {
        self.eligible
    }

    /// Close the application.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::ProductNotInPromo`] if no product was eligible.
    pub const fn finish(self) -> Result<PriceTotals, PromotionError> {
        if self.eligible == 0 {
            return Err(PromotionError::ProductNotInPromo);
        }

        Ok(self.totals)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn sale(percent: i64) -> Result<SalePercent, PromotionError> {
        SalePercent::from_stored(Some(percent))?.ok_or(PromotionError::InvalidSale(percent))
    }

    #[test]
    fn promo_code_is_trimmed_and_length_checked() -> TestResult {
        assert_eq!(PromoCode::parse("  SPRING10 ")?.as_str(), "SPRING10", "trimmed");
        assert_eq!(PromoCode::parse("   "), Err(PromotionError::InvalidCode), "blank");
        assert_eq!(
            PromoCode::parse(&"x".repeat(MAX_PROMO_CODE_LEN + 1)),
            Err(PromotionError::InvalidCode),
            "too long"
        );

        Ok(())
    }

    #[test]
    fn zero_or_missing_sale_means_not_in_group() -> TestResult {
        assert_eq!(SalePercent::from_stored(None)?, None, "missing sale");
        assert_eq!(SalePercent::from_stored(Some(0))?, None, "zero sale");
        assert_eq!(
            SalePercent::from_stored(Some(101)),
            Err(PromotionError::InvalidSale(101)),
            "above 100"
        );
        assert_eq!(
            SalePercent::from_stored(Some(-5)),
            Err(PromotionError::InvalidSale(-5)),
            "negative"
        );

        Ok(())
    }

    #[test]
    fn sale_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(sale(10)?.apply(90)?, 81, "90 * 0.9");
        assert_eq!(sale(50)?.apply(5)?, 3, "2.5 rounds up");
        assert_eq!(sale(15)?.apply(99)?, 84, "84.15 rounds down");
        assert_eq!(sale(100)?.apply(1234)?, 0, "free");

        Ok(())
    }

    #[test]
    fn ineligible_products_keep_catalog_price() -> TestResult {
        let price = PromoPrice::for_product(100, 90, None)?;

        assert!(!price.is_eligible(), "not in group");
        assert_eq!(price.base_cost(), 100, "base");
        assert_eq!(price.total_cost(), 90, "catalog total");

        Ok(())
    }

    #[test]
    fn application_without_eligible_products_fails() -> TestResult {
        let application = PromoApplication::new()
            .add(PromoPrice::for_product(100, 90, None)?, 1)?
            .add(PromoPrice::for_product(50, 50, None)?, 1)?;

        assert_eq!(application.eligible(), 0, "none eligible");
        assert_eq!(
            application.finish(),
            Err(PromotionError::ProductNotInPromo),
            "nothing eligible"
        );

        Ok(())
    }

    #[test]
    fn partial_application_includes_every_product() -> TestResult {
        let application = PromoApplication::new()
            .add(PromoPrice::for_product(100, 90, Some(sale(10)?))?, 2)?
            .add(PromoPrice::for_product(50, 50, None)?, 1)?;

        let totals = application.finish()?;

        assert_eq!(application.eligible(), 1, "one eligible");
        assert_eq!(totals.total_base_cost(), 250, "base of all products");
        assert_eq!(totals.total_cost(), 81 * 2 + 50, "discounted + full price");
        assert_eq!(totals.total_discount(), 250 - 212, "derived discount");

        Ok(())
    }
}
