//! Orders service errors.

use std::error::Error as StdError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{pagination::PaginatorError, pricing::PricingError, promotions::PromotionError};
use thiserror::Error;

use crate::domain::{
    carts::CartStoreError, profiles::ProfilesServiceError, promotions::PromotionsServiceError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("incorrect paginator")]
    IncorrectPaginator(#[from] PaginatorError),

    #[error("promo code not found")]
    PromoCodeNotFound,

    #[error("no product is in the promo group")]
    ProductNotInPromo,

    #[error("product not found")]
    ProductNotFound,

    #[error("cart not found")]
    CartNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("internal error")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::ProductNotFound,
            _ => Self::Internal(Box::new(error)),
        }
    }
}

impl From<PromotionsServiceError> for OrdersServiceError {
    fn from(error: PromotionsServiceError) -> Self {
        match error {
            PromotionsServiceError::NotFound => Self::PromoCodeNotFound,
            PromotionsServiceError::ProductNotFound(_) => Self::ProductNotFound,
            PromotionsServiceError::ProductNotInPromo => Self::ProductNotInPromo,
            other => Self::Internal(Box::new(other)),
        }
    }
}

impl From<PromotionError> for OrdersServiceError {
    fn from(error: PromotionError) -> Self {
        match error {
            PromotionError::ProductNotInPromo => Self::ProductNotInPromo,
            other => Self::Internal(Box::new(other)),
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(error: PricingError) -> Self {
        Self::Internal(Box::new(error))
    }
}

impl From<ProfilesServiceError> for OrdersServiceError {
    fn from(error: ProfilesServiceError) -> Self {
        match error {
            ProfilesServiceError::NotFound => Self::UserNotFound,
            other => Self::Internal(Box::new(other)),
        }
    }
}

impl From<CartStoreError> for OrdersServiceError {
    fn from(error: CartStoreError) -> Self {
        match error {
            CartStoreError::NotFound => Self::CartNotFound,
            other => Self::Internal(Box::new(other)),
        }
    }
}
