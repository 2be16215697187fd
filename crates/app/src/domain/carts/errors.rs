//! Carts errors.

use redis::RedisError;
use storefront::{cart::CartError, ids::ProductId, pricing::PricingError};
use thiserror::Error;

use crate::domain::products::ProductsServiceError;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cart not found")]
    NotFound,

    #[error("stored cart holds an invalid line")]
    InvalidLine(#[from] CartError),

    #[error("cart store error")]
    Redis(#[from] RedisError),

    #[error("cart serialization error")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart not found")]
    NotFound,

    #[error("product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("quantity overflowed")]
    QuantityOverflow,

    #[error("cart totals overflowed")]
    Pricing(#[from] PricingError),

    #[error("cart store error")]
    Store(#[source] CartStoreError),

    #[error("catalog error")]
    Catalog(#[source] ProductsServiceError),
}

impl From<CartStoreError> for CartsServiceError {
    fn from(error: CartStoreError) -> Self {
        match error {
            CartStoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::ZeroQuantity(_) => Self::ZeroQuantity,
        }
    }
}
