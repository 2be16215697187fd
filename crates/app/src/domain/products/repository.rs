//! Products Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::{ids::ProductId, pricing::UnitPrice};

use crate::{
    database::{encode_id, try_get_amount, try_get_id},
    domain::products::models::Product,
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(encode_id(product)?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount: i32 = row.try_get("discount")?;

        let discount = u8::try_from(discount).map_err(|e| sqlx::Error::ColumnDecode {
            index: "discount".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: try_get_id(row, "id")?,
            title: row.try_get("title")?,
            images: row.try_get("images")?,
            price: UnitPrice {
                base_cost: try_get_amount(row, "base_cost")?,
                total_cost: try_get_amount(row, "total_cost")?,
                discount,
            },
        })
    }
}
