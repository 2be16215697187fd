//! Storefront Domain Concerns

pub mod carts;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod promotions;
