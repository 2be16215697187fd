//! Orders

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    cart::PricedCartLine,
    ids::ProductId,
    promotions::{PromoCode, PromotionError},
};

/// Longest accepted name or address field.
pub const MAX_FIELD_LEN: usize = 30;

/// Errors raised while validating checkout details.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderDetailsError {
    /// Recipient first name is empty, too long or not made of letters.
    #[error("first name must be 1-{MAX_FIELD_LEN} letters")]
    InvalidFirstName,

    /// Recipient last name is empty, too long or not made of letters.
    #[error("last name must be 1-{MAX_FIELD_LEN} letters")]
    InvalidLastName,

    /// Recipient e-mail is not an address.
    #[error("invalid e-mail address")]
    InvalidEmail,

    /// Shipping address is empty or too long.
    #[error("address must be 1-{MAX_FIELD_LEN} characters")]
    InvalidAddress,

    /// Promo code is malformed.
    #[error(transparent)]
    PromoCode(#[from] PromotionError),
}

/// Person an order ships to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// First name.
    pub first_name: String,

    /// Last name.
    pub last_name: String,

    /// Contact e-mail.
    pub email: String,
}

/// Everything a user submits at checkout besides the cart itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    recipient: Recipient,
    address: String,
    promo_code: Option<PromoCode>,
}

impl OrderDetails {
    /// Validate checkout details. A blank promo code means no promo code.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderDetailsError`] naming the first invalid field.
    pub fn new(
        recipient: Recipient,
        address: &str,
        promo_code: Option<&str>,
    ) -> Result<Self, OrderDetailsError> {
        let recipient = Recipient {
            first_name: name(&recipient.first_name).ok_or(OrderDetailsError::InvalidFirstName)?,
            last_name: name(&recipient.last_name).ok_or(OrderDetailsError::InvalidLastName)?,
            email: email(&recipient.email).ok_or(OrderDetailsError::InvalidEmail)?,
        };

        let address = bounded(address).ok_or(OrderDetailsError::InvalidAddress)?;

        let promo_code = match promo_code.map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(PromoCode::parse(code)?),
        };

        Ok(Self {
            recipient,
            address,
            promo_code,
        })
    }

    /// Recipient of the order.
    pub const fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    /// Shipping address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Promo code to apply, if any.
    pub const fn promo_code(&self) -> Option<&PromoCode> {
        self.promo_code.as_ref()
    }
}

fn bounded(value: &str) -> Option<String> {
    let value = value.trim();
    let len = value.chars().count();

    (1..=MAX_FIELD_LEN)
        .contains(&len)
        .then(|| value.to_string())
}

fn name(value: &str) -> Option<String> {
    bounded(value).filter(|name| name.chars().all(char::is_alphabetic))
}

fn email(value: &str) -> Option<String> {
    let value = value.trim();
    let (local, domain) = value.split_once('@')?;

    let valid = !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace);

    valid.then(|| value.to_string())
}

/// A cart line frozen into an order at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedProduct {
    /// Product id.
    pub product: ProductId,

    /// Number of units ordered.
    pub quantity: u64,

    /// Unit base cost at checkout.
    pub base_cost: u64,

    /// Catalog discount in percent at checkout.
    pub discount: u8,
}

impl From<&PricedCartLine> for OrderedProduct {
    fn from(line: &PricedCartLine) -> Self {
        Self {
            product: line.product,
            quantity: line.quantity,
            base_cost: line.price.base_cost,
            discount: line.price.discount,
        }
    }
}

/// Human-facing order number generated by the order store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wrap a stored order number.
    pub const fn new(number: String) -> Self {
        Self(number)
    }

    /// The order number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OrderStatus {
    /// Order committed at checkout.
    #[default]
    Placed,

    /// Order handed to delivery.
    Shipped,

    /// Order delivered.
    Received,
}

impl OrderStatus {
    /// Stored representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Shipped => "shipped",
            Self::Received => "received",
        }
    }
}

/// Error for unknown stored status values.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status {0:?}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placed" => Ok(Self::Placed),
            "shipped" => Ok(Self::Shipped),
            "received" => Ok(Self::Received),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
