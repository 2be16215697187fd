//! Orders service.
//!
//! Checkout prices the cart first, then takes the user's checkout lock: re-read
//! cart, persist order and line items in one transaction on the locked
//! connection, clear the cart. A checkout holds at most one pooled connection at
//! a time. A cart that cannot be cleared after the order committed is reported
//! as [`OrdersServiceError::CartNotFound`]; the order stays.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    cart::PricedCart,
    ids::UserId,
    orders::{OrderDetails, OrderedProduct},
    pagination::{Paginator, PaginatorError},
    pricing::PriceTotals,
    promotions::PromoApplication,
};
use tracing::{Span, error, info};

use crate::{
    database::{CheckoutLock, Db},
    domain::{
        carts::{CartStore, CartStoreError},
        orders::{
            errors::OrdersServiceError,
            models::{PlacedOrder, PreviewOrder, RangeOrders},
            repository::PgOrdersRepository,
        },
        profiles::ProfilesService,
        promotions::PromotionsService,
    },
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts: Arc<dyn CartStore>,
    promotions: Arc<dyn PromotionsService>,
    profiles: Arc<dyn ProfilesService>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        carts: Arc<dyn CartStore>,
        promotions: Arc<dyn PromotionsService>,
        profiles: Arc<dyn ProfilesService>,
    ) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts,
            promotions,
            profiles,
        }
    }

    async fn place_order(
        &self,
        lock: &mut CheckoutLock,
        details: &OrderDetails,
        user: UserId,
        preview: &PricedCart,
        totals: PriceTotals,
    ) -> Result<PlacedOrder, OrdersServiceError> {
        match self.carts.get_cart(user).await {
            Ok(_) => {}
            Err(CartStoreError::NotFound) if preview.is_empty() => {}
            Err(error) => return Err(error.into()),
        }

        let items: Vec<OrderedProduct> = preview.lines().iter().map(OrderedProduct::from).collect();

        let mut tx = lock.begin().await?;

        let (order_id, order_number) = self
            .repository
            .insert_order(&mut tx, user, details, totals)
            .await?;

        self.repository
            .insert_line_items(&mut tx, order_id, &items)
            .await?;

        tx.commit().await?;

        let span = Span::current();

        span.record("order_number", tracing::field::display(&order_number));
        span.record("total_cost", totals.total_cost());

        info!(
            user_id = %user,
            order_id = %order_id,
            order_number = %order_number,
            "committed order"
        );

        if let Err(error) = self.carts.delete_cart(user).await {
            error!(
                user_id = %user,
                order_number = %order_number,
                %error,
                "order committed but cart was not cleared"
            );

            return Err(OrdersServiceError::CartNotFound);
        }

        Ok(PlacedOrder {
            order_id,
            order_number,
        })
    }
}

/// Totals an order is placed with. Without a promo code these are the totals of
/// the priced cart. With one, every line is re-priced under the code, weighted by
/// its quantity, and at least one line must be in the promo group.
///
/// # Errors
///
/// - [`OrdersServiceError::PromoCodeNotFound`]: the code does not exist.
/// - [`OrdersServiceError::ProductNotFound`]: a product left the catalog.
/// - [`OrdersServiceError::ProductNotInPromo`]: the code discounts no line.
pub async fn checkout_totals(
    promotions: &dyn PromotionsService,
    details: &OrderDetails,
    cart: &PricedCart,
) -> Result<PriceTotals, OrdersServiceError> {
    let Some(code) = details.promo_code() else {
        return Ok(cart.totals());
    };

    promotions.check_promo_exists(code).await?;

    let mut application = PromoApplication::new();

    for line in cart.lines() {
        let price = promotions.price_with_promo(line.product, code).await?;

        application = application.add(price, line.quantity)?;
    }

    Ok(application.finish()?)
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.get_preview_order",
        skip(self, cart),
        fields(user_id = %user, line_count = cart.lines().len()),
        err
    )]
    async fn get_preview_order(
        &self,
        user: UserId,
        cart: PricedCart,
    ) -> Result<PreviewOrder, OrdersServiceError> {
        let recipient = self.profiles.get_recipient(user).await?;

        Ok(PreviewOrder { recipient, cart })
    }

    #[tracing::instrument(
        name = "orders.service.add_completed_order",
        skip(self, details, preview),
        fields(
            user_id = %user,
            line_count = preview.lines().len(),
            has_promo_code = details.promo_code().is_some(),
            order_number = tracing::field::Empty,
            total_cost = tracing::field::Empty
        ),
        err
    )]
    async fn add_completed_order(
        &self,
        details: &OrderDetails,
        user: UserId,
        preview: PricedCart,
    ) -> Result<PlacedOrder, OrdersServiceError> {
        let totals = checkout_totals(self.promotions.as_ref(), details, &preview).await?;

        let mut lock = self.db.lock_checkout(user).await?;

        let placed = self
            .place_order(&mut lock, details, user, &preview, totals)
            .await;

        lock.release().await;

        placed
    }

    #[tracing::instrument(
        name = "orders.service.get_range_orders",
        skip(self, paginator),
        fields(
            user_id = %user,
            page_num = paginator.page_num(),
            count = paginator.count(),
            max_count_pages = tracing::field::Empty
        ),
        err
    )]
    async fn get_range_orders(
        &self,
        user: UserId,
        paginator: Paginator,
    ) -> Result<RangeOrders, OrdersServiceError> {
        let (Ok(limit), Ok(offset)) = (
            i64::try_from(paginator.count()),
            i64::try_from(paginator.offset()?),
        ) else {
            return Err(PaginatorError::Overflow.into());
        };

        let order_by = paginator.order_by_clause();

        let mut tx = self.db.begin().await?;

        let total = self.repository.count_for_user(&mut tx, user).await?;
        let max_count_pages = paginator.max_pages(total);

        let mut orders = self
            .repository
            .select_range(&mut tx, user, &order_by, limit, offset)
            .await?;

        for order in &mut orders {
            order.products = self.repository.line_items_for(&mut tx, order.id).await?;
        }

        tx.commit().await?;

        Span::current().record("max_count_pages", max_count_pages);

        Ok(RangeOrders {
            orders,
            max_count_pages,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Recipient details and priced lines shown before checkout.
    async fn get_preview_order(
        &self,
        user: UserId,
        cart: PricedCart,
    ) -> Result<PreviewOrder, OrdersServiceError>;

    /// Place an order from a priced cart and clear the user's cart.
    async fn add_completed_order(
        &self,
        details: &OrderDetails,
        user: UserId,
        preview: PricedCart,
    ) -> Result<PlacedOrder, OrdersServiceError>;

    /// One page of the user's orders with the product previews of each order.
    async fn get_range_orders(
        &self,
        user: UserId,
        paginator: Paginator,
    ) -> Result<RangeOrders, OrdersServiceError>;
}
