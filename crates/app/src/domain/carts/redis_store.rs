//! Redis Cart Store
//!
//! Each cart is one JSON document under `{prefix}:{user_id}` mapping product ids
//! to their quantity. Carts have no expiry.

use std::collections::BTreeMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use storefront::{
    cart::CartLine,
    ids::{ProductId, UserId},
};
use tracing::{debug, info};

use crate::domain::carts::{errors::CartStoreError, store::CartStore};

/// Default prefix of cart keys.
pub const DEFAULT_KEY_PREFIX: &str = "cart";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCart {
    products: BTreeMap<u64, StoredLine>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    count: u64,
}

impl StoredCart {
    fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            products: lines
                .iter()
                .map(|line| {
                    (
                        line.product().into_inner(),
                        StoredLine {
                            count: line.quantity(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn into_lines(self) -> Result<Vec<CartLine>, CartStoreError> {
        self.products
            .into_iter()
            .map(|(product, line)| {
                CartLine::new(ProductId::new(product), line.count).map_err(CartStoreError::from)
            })
            .collect()
    }
}

/// Cart store backed by Redis.
#[derive(Clone)]
pub struct RedisCartStore {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisCartStore {
    /// Connect to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, CartStoreError> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        info!(key_prefix, "connected to cart store");

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn cart_key(&self, user: UserId) -> String {
        format!("{}:{user}", self.key_prefix)
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn get_cart(&self, user: UserId) -> Result<Vec<CartLine>, CartStoreError> {
        let key = self.cart_key(user);
        let mut conn = self.conn.clone();

        let payload: Option<String> = conn.get(&key).await?;

        let Some(payload) = payload else {
            return Err(CartStoreError::NotFound);
        };

        let lines = serde_json::from_str::<StoredCart>(&payload)?.into_lines()?;

        debug!(user_id = %user, line_count = lines.len(), "loaded cart");

        Ok(lines)
    }

    async fn put_cart(&self, user: UserId, lines: Vec<CartLine>) -> Result<(), CartStoreError> {
        if lines.is_empty() {
            self.delete_cart(user).await?;

            return Ok(());
        }

        let key = self.cart_key(user);
        let payload = serde_json::to_string(&StoredCart::from_lines(&lines))?;
        let mut conn = self.conn.clone();

        let _: () = conn.set(&key, payload).await?;

        debug!(user_id = %user, line_count = lines.len(), "stored cart");

        Ok(())
    }

    async fn delete_cart(&self, user: UserId) -> Result<bool, CartStoreError> {
        let key = self.cart_key(user);
        let mut conn = self.conn.clone();

        let removed: u64 = conn.del(&key).await?;

        debug!(user_id = %user, removed, "deleted cart");

        Ok(removed > 0)
    }
}
