//! Offset pagination primitives shared by list endpoints.
//!
//! A [`Paginator`] turns untrusted `page`/`limit` request values into a
//! validated window over a result set. Invalid input never fails: absent,
//! zero, negative, or non-numeric values fall back to [`DEFAULT_PAGE`] and
//! [`DEFAULT_LIMIT`], while positive values too large to represent saturate
//! at `u32::MAX`. Once the total record count is
//! known, [`Paginator::metadata`] derives the descriptor returned to clients.
//!
//! # Examples
//! ```
//! use pagination::Paginator;
//!
//! let paginator = Paginator::from_query(Some("3"), Some("10"));
//! assert_eq!(paginator.offset(), 20);
//!
//! let metadata = paginator.metadata(41);
//! assert_eq!(metadata.last_page, 5);
//! ```

use serde::{Deserialize, Serialize};

/// Page used when the request omits or mangles the page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request omits or mangles the limit.
pub const DEFAULT_LIMIT: u32 = 5;

/// Index of the first page. Pages are one-based.
pub const FIRST_PAGE: u32 = 1;

/// Validated page window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Paginator {
    page: u32,
    limit: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Paginator {
    /// Build a paginator from already-parsed integers.
    ///
    /// Values that are absent or not strictly positive are replaced by their
    /// defaults. Positive values wider than `u32` saturate at `u32::MAX`, so
    /// an absurd page still lands past the last page.
    ///
    /// # Examples
    /// ```
    /// use pagination::{DEFAULT_LIMIT, Paginator};
    ///
    /// let paginator = Paginator::new(Some(2), Some(-4));
    /// assert_eq!(paginator.page(), 2);
    /// assert_eq!(paginator.limit(), DEFAULT_LIMIT);
    /// ```
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: coerce(page, DEFAULT_PAGE),
            limit: coerce(limit, DEFAULT_LIMIT),
        }
    }

    /// Build a paginator from raw query-string values.
    ///
    /// Surrounding whitespace is ignored; anything that does not parse as an
    /// integer is treated as absent. A run of digits too long for `i64` is
    /// read as the largest positive value.
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_raw(page), parse_raw(limit))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of records on a page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(FIRST_PAGE)) * u64::from(self.limit)
    }

    /// Index of the last page for `total_records`, never below the first page.
    #[must_use]
    pub fn last_page(&self, total_records: u64) -> u64 {
        total_records
            .div_ceil(u64::from(self.limit))
            .max(u64::from(FIRST_PAGE))
    }

    /// Describe this window for a result set holding `total_records` rows.
    ///
    /// Pages past the last page are valid; they describe an empty slice.
    #[must_use]
    pub fn metadata(&self, total_records: u64) -> PaginationMetadata {
        PaginationMetadata {
            total_records,
            page: self.page,
            limit: self.limit,
            first_page: FIRST_PAGE,
            last_page: self.last_page(total_records),
        }
    }
}

/// Pagination descriptor returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Number of records matching the filter across all pages.
    pub total_records: u64,
    /// Page that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Always [`FIRST_PAGE`].
    pub first_page: u32,
    /// `max(1, ceil(total_records / limit))`.
    pub last_page: u64,
}

fn parse_raw(raw: Option<&str>) -> Option<i64> {
    let value = raw?.trim();
    value.parse::<i64>().ok().or_else(|| {
        let digits = value.strip_prefix('+').unwrap_or(value);
        (!digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()))
            .then_some(i64::MAX)
    })
}

fn coerce(value: Option<i64>, fallback: u32) -> u32 {
    match value {
        Some(candidate) if candidate > 0 => u32::try_from(candidate).unwrap_or(u32::MAX),
        _ => fallback,
    }
}
