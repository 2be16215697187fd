//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront::{
    ids::{OrderId, UserId},
    orders::{OrderDetails, OrderNumber, OrderStatus, OrderedProduct, Recipient},
    pricing::PriceTotals,
};

use crate::{
    database::{encode_amount, encode_id, try_get_amount, try_get_id},
    domain::orders::models::{LineItemPreview, Order},
};

const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_LINE_ITEMS_SQL: &str = include_str!("sql/insert_line_items.sql");
const COUNT_FOR_USER_SQL: &str = include_str!("sql/count_for_user.sql");
const SELECT_RANGE_SQL: &str = include_str!("sql/select_range.sql");
const LINE_ITEMS_FOR_SQL: &str = include_str!("sql/line_items_for.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        details: &OrderDetails,
        totals: PriceTotals,
    ) -> Result<(OrderId, OrderNumber), sqlx::Error> {
        let recipient = details.recipient();

        let row = query(INSERT_ORDER_SQL)
            .bind(encode_id(user)?)
            .bind(&recipient.first_name)
            .bind(&recipient.last_name)
            .bind(&recipient.email)
            .bind(details.address())
            .bind(encode_amount(totals.total_base_cost())?)
            .bind(encode_amount(totals.total_cost())?)
            .bind(encode_amount(totals.total_discount())?)
            .fetch_one(&mut **tx)
            .await?;

        Ok((
            try_get_id(&row, "id")?,
            OrderNumber::new(row.try_get("order_num")?),
        ))
    }

    pub(crate) async fn insert_line_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        items: &[OrderedProduct],
    ) -> Result<u64, sqlx::Error> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut product_ids = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut base_costs = Vec::with_capacity(items.len());
        let mut discounts = Vec::with_capacity(items.len());

        for item in items {
            product_ids.push(encode_id(item.product)?);
            quantities.push(encode_amount(item.quantity)?);
            base_costs.push(encode_amount(item.base_cost)?);
            discounts.push(i32::from(item.discount));
        }

        let rows_affected = query(INSERT_LINE_ITEMS_SQL)
            .bind(encode_id(order)?)
            .bind(product_ids)
            .bind(quantities)
            .bind(base_costs)
            .bind(discounts)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_FOR_USER_SQL)
            .bind(encode_id(user)?)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    /// Orders of `user` sorted by `order_by`, which must be built from validated
    /// sort options only.
    pub(crate) async fn select_range(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        order_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let sql = format!("{}\n{order_by}\nLIMIT $2 OFFSET $3", SELECT_RANGE_SQL.trim_end());

        query_as::<Postgres, Order>(&sql)
            .bind(encode_id(user)?)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn line_items_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Vec<LineItemPreview>, sqlx::Error> {
        let rows = query(LINE_ITEMS_FOR_SQL)
            .bind(encode_id(order)?)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(LineItemPreview {
                    product: try_get_id(row, "product_id")?,
                    preview_image: row.try_get("preview_image")?,
                })
            })
            .collect()
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let totals = PriceTotals::new(
            try_get_amount(row, "base_cost")?,
            try_get_amount(row, "total_cost")?,
        )
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "total_cost".to_string(),
            source: Box::new(e),
        })?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: try_get_id(row, "id")?,
            order_number: OrderNumber::new(row.try_get("order_num")?),
            recipient: Recipient {
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
            },
            address: row.try_get("address")?,
            totals,
            date_added: row.try_get::<SqlxTimestamp, _>("date_added")?.to_jiff(),
            date_delivery: row.try_get::<SqlxTimestamp, _>("date_delivery")?.to_jiff(),
            status,
            products: Vec::new(),
        })
    }
}
