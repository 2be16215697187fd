//! Typed Ids
//!
//! Every entity in the storefront is keyed by a positive 64-bit number issued by
//! the owning store. Wrapping those numbers in a marker-typed newtype keeps a user
//! id from ever being passed where a product id is expected.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::TryFromIntError,
};

/// Numeric identifier tagged with the entity it belongs to.
pub struct TypedId<T>(u64, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id, PhantomData)
    }

    /// Return the raw id.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Convert from a signed database column value.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is negative.
    pub fn try_from_i64(value: i64) -> Result<Self, TryFromIntError> {
        u64::try_from(value).map(Self::new)
    }

    /// Convert into a signed value suitable for binding to a `BIGINT` column.
    ///
    /// # Errors
    ///
    /// Returns an error when the id does not fit in an `i64`.
    pub fn try_into_i64(self) -> Result<i64, TryFromIntError> {
        i64::try_from(self.0)
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<u64> for TypedId<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> From<TypedId<T>> for u64 {
    fn from(value: TypedId<T>) -> Self {
        value.into_inner()
    }
}

/// Marker for user ids.
#[derive(Debug)]
pub enum UserKey {}

/// Marker for product ids.
#[derive(Debug)]
pub enum ProductKey {}

/// Marker for order ids.
#[derive(Debug)]
pub enum OrderKey {}

/// User Id
pub type UserId = TypedId<UserKey>;

/// Product Id
pub type ProductId = TypedId<ProductKey>;

/// Order Id
pub type OrderId = TypedId<OrderKey>;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn negative_database_values_are_rejected() {
        assert!(
            ProductId::try_from_i64(-1).is_err(),
            "negative ids must not decode"
        );
    }

    #[test]
    fn ids_above_i64_cannot_be_bound() {
        assert!(
            UserId::new(u64::MAX).try_into_i64().is_err(),
            "u64::MAX does not fit a BIGINT"
        );
    }

    #[test]
    fn ids_order_by_raw_value() {
        let ids: BTreeSet<ProductId> = [3, 1, 2].into_iter().map(ProductId::new).collect();
        let raw: Vec<u64> = ids.into_iter().map(u64::from).collect();

        assert_eq!(raw, vec![1, 2, 3], "ids should sort numerically");
    }
}
