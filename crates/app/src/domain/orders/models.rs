//! Order Models

use jiff::Timestamp;
use storefront::{
    cart::PricedCart,
    ids::{OrderId, ProductId},
    orders::{OrderNumber, OrderStatus, Recipient},
    pricing::PriceTotals,
};

/// What a user reviews before checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOrder {
    pub recipient: Recipient,
    pub cart: PricedCart,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub order_number: OrderNumber,
}

/// Product of a placed order as shown in order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemPreview {
    pub product: ProductId,
    pub preview_image: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub recipient: Recipient,
    pub address: String,
    pub totals: PriceTotals,
    pub date_added: Timestamp,
    pub date_delivery: Timestamp,
    pub status: OrderStatus,
    pub products: Vec<LineItemPreview>,
}

/// One page of a user's orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeOrders {
    pub orders: Vec<Order>,
    pub max_count_pages: u64,
}
