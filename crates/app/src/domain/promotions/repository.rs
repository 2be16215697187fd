//! Promotions Repository

use sqlx::{Postgres, Row, Transaction, query, query_scalar};
use storefront::{
    ids::ProductId,
    promotions::{PromoCode, PromoPrice, PromotionError, SalePercent},
};

use crate::database::{encode_id, try_get_amount};

const CODE_EXISTS_SQL: &str = include_str!("sql/code_exists.sql");
const GET_DISCOUNTED_PRICE_SQL: &str = include_str!("sql/get_discounted_price.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn code_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &PromoCode,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(CODE_EXISTS_SQL)
            .bind(code.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Catalog costs of `product` and the sale `code` gives it. `None` when the
    /// product does not exist.
    pub(crate) async fn get_discounted_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        code: &PromoCode,
    ) -> Result<Option<DiscountedPriceRow>, sqlx::Error> {
        let Some(row) = query(GET_DISCOUNTED_PRICE_SQL)
            .bind(encode_id(product)?)
            .bind(code.as_str())
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(DiscountedPriceRow {
            base_cost: try_get_amount(&row, "base_cost")?,
            total_cost: try_get_amount(&row, "total_cost")?,
            sale: row.try_get("sale")?,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DiscountedPriceRow {
    base_cost: u64,
    total_cost: u64,
    sale: Option<i64>,
}

impl DiscountedPriceRow {
    pub(crate) fn into_promo_price(self) -> Result<PromoPrice, PromotionError> {
        let sale = SalePercent::from_stored(self.sale)?;

        PromoPrice::for_product(self.base_cost, self.total_cost, sale)
    }
}
