//! Cart Store

use async_trait::async_trait;
use mockall::automock;
use storefront::{cart::CartLine, ids::UserId};

use crate::domain::carts::errors::CartStoreError;

/// Per-user product quantities, kept apart from the catalog and order stores.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Lines of the user's cart, ordered by product id.
    ///
    /// Fails with [`CartStoreError::NotFound`] when the user has no cart.
    async fn get_cart(&self, user: UserId) -> Result<Vec<CartLine>, CartStoreError>;

    /// Replace the user's cart. An empty set of lines removes the cart.
    async fn put_cart(&self, user: UserId, lines: Vec<CartLine>) -> Result<(), CartStoreError>;

    /// Remove the user's cart. Returns whether a cart was removed.
    async fn delete_cart(&self, user: UserId) -> Result<bool, CartStoreError>;
}
