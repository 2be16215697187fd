//! Product Models

use storefront::{ids::ProductId, pricing::UnitPrice};

/// Catalog entry of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub images: Vec<String>,
    pub price: UnitPrice,
}

impl Product {
    /// First image, shown as the product preview.
    #[must_use]
    pub fn preview_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
