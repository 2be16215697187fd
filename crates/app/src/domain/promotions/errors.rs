//! Promotions service errors.

use sqlx::Error;
use storefront::{ids::ProductId, promotions::PromotionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    #[error("promo code not found")]
    NotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("no product is in the promo group")]
    ProductNotInPromo,

    #[error("invalid promo group")]
    InvalidPromoGroup(#[source] PromotionError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PromotionsServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::NotFound,
            other => Self::Sql(other),
        }
    }
}

impl From<PromotionError> for PromotionsServiceError {
    fn from(error: PromotionError) -> Self {
        match error {
            PromotionError::ProductNotInPromo => Self::ProductNotInPromo,
            other => Self::InvalidPromoGroup(other),
        }
    }
}
