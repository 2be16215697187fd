//! Storefront
//!
//! Pure pricing rules of the storefront backend: priced carts, promo code
//! arithmetic, order assembly values and order pagination. Nothing in this crate
//! performs I/O.

pub mod cart;
pub mod ids;
pub mod orders;
pub mod pagination;
pub mod pricing;
pub mod promotions;
