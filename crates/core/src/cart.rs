//! Carts

use thiserror::Error;

use crate::{
    ids::ProductId,
    pricing::{PriceTotals, PricingError, UnitPrice},
};

/// Errors related to raw cart lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A cart line must hold at least one unit.
    #[error("cart line for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// A product and the number of units a user keeps in their cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    product: ProductId,
    quantity: u64,
}

impl CartLine {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] when `quantity` is zero.
    pub const fn new(product: ProductId, quantity: u64) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product));
        }

        Ok(Self { product, quantity })
    }

    /// Product held by this line.
    pub const fn product(&self) -> ProductId {
        self.product
    }

    /// Number of units, always at least one.
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }
}

/// A cart line joined with the catalog entry of its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCartLine {
    /// Product id.
    pub product: ProductId,

    /// Product title at read time.
    pub title: String,

    /// First product image, if the product has any.
    pub preview_image: Option<String>,

    /// Number of units.
    pub quantity: u64,

    /// Unit price at read time.
    pub price: UnitPrice,
}

/// A user's cart priced against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PricedCart {
    lines: Vec<PricedCartLine>,
    totals: PriceTotals,
}

impl PricedCart {
    /// A cart with no lines and zero totals.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Price a set of lines, summing `unit cost * quantity` for every line.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line is priced inconsistently or the totals
    /// overflow.
    pub fn from_lines(lines: Vec<PricedCartLine>) -> Result<Self, PricingError> {
        let totals = lines.iter().try_fold(PriceTotals::ZERO, |totals, line| {
            totals.add_line(line.price.base_cost, line.price.total_cost, line.quantity)
        })?;

        Ok(Self { lines, totals })
    }

    /// Priced lines, ordered by product id.
    pub fn lines(&self) -> &[PricedCartLine] {
        &self.lines
    }

    /// Quantity-weighted totals over [`Self::lines`].
    pub const fn totals(&self) -> PriceTotals {
        self.totals
    }

    /// Take the lines back, dropping the totals computed from them.
    pub fn into_lines(self) -> Vec<PricedCartLine> {
        self.lines
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Ids of every product in the cart.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|line| line.product).collect()
    }
}
