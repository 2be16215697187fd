//! Order Pagination

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors raised while validating a paginator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginatorError {
    /// Pages are numbered from one.
    #[error("page number must be at least 1")]
    ZeroPage,

    /// A page holds at least one order.
    #[error("page size must be at least 1")]
    ZeroCount,

    /// Orders can only be sorted by a known key.
    #[error("unknown sort key {0:?}")]
    UnknownSortKey(String),

    /// Sort direction is either `ASC` or `DESC`.
    #[error("unknown sort direction {0:?}")]
    UnknownSortDirection(String),

    /// The requested window does not fit the store's offset type.
    #[error("page window overflowed")]
    Overflow,
}

/// Key orders can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Date the order was placed.
    #[default]
    Date,
}

impl SortKey {
    const fn column(self) -> &'static str {
        match self {
            Self::Date => "date_added",
        }
    }
}

impl FromStr for SortKey {
    type Err = PaginatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::Date),
            other => Err(PaginatorError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Oldest first.
    Asc,

    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = PaginatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(PaginatorError::UnknownSortDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A validated request for one page of a user's orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_num: u64,
    count: u64,
    sort_key: SortKey,
    direction: SortDirection,
}

impl Paginator {
    /// Validate page number and size.
    ///
    /// # Errors
    ///
    /// - [`PaginatorError::ZeroPage`]: `page_num` is zero.
    /// - [`PaginatorError::ZeroCount`]: `count` is zero.
    pub const fn new(
        page_num: u64,
        count: u64,
        sort_key: SortKey,
        direction: SortDirection,
    ) -> Result<Self, PaginatorError> {
        if page_num == 0 {
            return Err(PaginatorError::ZeroPage);
        }

        if count == 0 {
            return Err(PaginatorError::ZeroCount);
        }

        Ok(Self {
            page_num,
            count,
            sort_key,
            direction,
        })
    }

    /// Validate a paginator whose sort options arrive as raw strings.
    ///
    /// # Errors
    ///
    /// Returns a [`PaginatorError`] for a zero page/size or unknown sort options.
    pub fn parse(
        page_num: u64,
        count: u64,
        sort_key: &str,
        direction: &str,
    ) -> Result<Self, PaginatorError> {
        Self::new(page_num, count, sort_key.parse()?, direction.parse()?)
    }

    /// One-based page number.
    pub const fn page_num(&self) -> u64 {
        self.page_num
    }

    /// Orders per page.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Sort key.
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Sort direction.
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of orders to skip before this page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginatorError::Overflow`] if the offset does not fit in `u64`.
    pub const fn offset(&self) -> Result<u64, PaginatorError> {
        match (self.page_num - 1).checked_mul(self.count) {
            Some(offset) => Ok(offset),
            None => Err(PaginatorError::Overflow),
        }
    }

    /// Number of pages needed for `total` orders: `ceil(total / count)`.
    pub const fn max_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.count)
    }

    /// `ORDER BY` clause built only from the validated key and direction. Ties on
    /// the key are broken by id in the same direction so pages are stable.
    pub fn order_by_clause(&self) -> String {
        let direction = self.direction.keyword();

        format!(
            "ORDER BY {} {direction}, id {direction}",
            self.sort_key.column()
        )
    }
}
