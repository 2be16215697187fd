//! Promotions

pub mod errors;
mod repository;
pub mod service;

pub use errors::PromotionsServiceError;
pub use service::*;
