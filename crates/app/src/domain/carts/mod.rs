//! Carts

pub mod errors;
pub mod redis_store;
pub mod service;
pub mod store;

pub use errors::{CartStoreError, CartsServiceError};
pub use redis_store::RedisCartStore;
pub use service::*;
pub use store::*;
