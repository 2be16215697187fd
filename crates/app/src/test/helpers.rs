//! Test Helpers
//!
//! Catalog, promo code and profile rows are owned by other systems, so tests seed
//! them with plain SQL.

use sqlx::{query, query_scalar};
use storefront::ids::{ProductId, UserId};

use crate::test::TestContext;

/// Catalog row to seed.
#[derive(Debug, Clone)]
pub(crate) struct NewTestProduct {
    pub title: String,
    pub images: Vec<String>,
    pub base_cost: i64,
    pub total_cost: i64,
    pub discount: i32,
    pub sale_group: Vec<i64>,
}

impl NewTestProduct {
    pub(crate) fn priced(title: &str, base_cost: i64, total_cost: i64, discount: i32) -> Self {
        Self {
            title: title.to_string(),
            images: Vec::new(),
            base_cost,
            total_cost,
            discount,
            sale_group: Vec::new(),
        }
    }
}

impl TestContext {
    pub(crate) async fn create_product(
        &self,
        product: NewTestProduct,
    ) -> Result<ProductId, sqlx::Error> {
        let id: i64 = query_scalar(
            "INSERT INTO products (title, images, base_cost, total_cost, discount, sale_group) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(product.title)
        .bind(product.images)
        .bind(product.base_cost)
        .bind(product.total_cost)
        .bind(product.discount)
        .bind(product.sale_group)
        .fetch_one(self.db.pool())
        .await?;

        ProductId::try_from_i64(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    /// Create a promo code and return the id products list in their sale group.
    pub(crate) async fn create_promo_code(
        &self,
        code: &str,
        sale: i32,
    ) -> Result<i64, sqlx::Error> {
        query_scalar("INSERT INTO promo_codes (code, sale) VALUES ($1, $2) RETURNING id")
            .bind(code)
            .bind(sale)
            .fetch_one(self.db.pool())
            .await
    }

    pub(crate) async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<UserId, sqlx::Error> {
        let id: i64 = query_scalar(
            "INSERT INTO user_profiles (first_name, last_name, email) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .fetch_one(self.db.pool())
        .await?;

        UserId::try_from_i64(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    pub(crate) async fn count_orders(&self, user: UserId) -> Result<i64, sqlx::Error> {
        let user = i64::try_from(user.into_inner()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_scalar("SELECT COUNT(*) FROM user_orders WHERE user_id = $1")
            .bind(user)
            .fetch_one(self.db.pool())
            .await
    }

    pub(crate) async fn set_order_status(
        &self,
        order_number: &str,
        status: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query("UPDATE user_orders SET status = $2 WHERE order_num = $1")
            .bind(order_number)
            .bind(status)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
