//! Offset pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] carries a validated one-based page number and page size.
//! Repositories read [`PageRequest::offset`] and [`PageRequest::limit`] to
//! window their queries, then wrap the rows in a [`Page`] which derives the
//! page count from the total number of matching records.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(Some(3), Some(10)).expect("valid request");
//! assert_eq!(request.offset(), 20);
//!
//! let page: Page<u32> = Page::new(Vec::new(), 5, request);
//! assert_eq!(page.total_pages(), 1);
//! assert!(page.items().is_empty());
//! ```

use serde::Serialize;

/// Page number used when the client does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised while validating client supplied page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number was zero or negative.
    #[error("page must be a positive integer (got {value})")]
    InvalidPage {
        /// The rejected value.
        value: i64,
    },
    /// The page size was zero or negative.
    #[error("per_page must be a positive integer (got {value})")]
    InvalidPerPage {
        /// The rejected value.
        value: i64,
    },
    /// The page size exceeded [`MAX_PER_PAGE`].
    #[error("per_page must be at most {max} (got {value})")]
    PerPageTooLarge {
        /// The rejected value.
        value: i64,
        /// The configured maximum.
        max: u32,
    },
}

/// Validated one-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a request from optional raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when either value is not positive or the
    /// page size exceeds [`MAX_PER_PAGE`].
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Result<Self, PageRequestError> {
        let page = match page {
            None => DEFAULT_PAGE,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|parsed| *parsed > 0)
                .ok_or(PageRequestError::InvalidPage { value })?,
        };
        let per_page = match per_page {
            None => DEFAULT_PER_PAGE,
            Some(value) if value <= 0 => return Err(PageRequestError::InvalidPerPage { value }),
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|parsed| *parsed <= MAX_PER_PAGE)
                .ok_or(PageRequestError::PerPageTooLarge {
                    value,
                    max: MAX_PER_PAGE,
                })?,
        };
        Ok(Self { page, per_page })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of records to skip, `(page - 1) * per_page`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

/// Number of pages needed to hold `total` records, rounding up.
///
/// A zero page size yields zero pages rather than dividing by zero.
///
/// # Examples
///
/// ```
/// assert_eq!(pagination::total_pages(5, 10), 1);
/// assert_eq!(pagination::total_pages(21, 10), 3);
/// assert_eq!(pagination::total_pages(0, 10), 0);
/// ```
#[must_use]
pub const fn total_pages(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as u64)
}

/// One window of results plus the metadata needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    per_page: u32,
    total_pages: u64,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request` out of `total` matching records.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
            total_pages: total_pages(total, request.per_page()),
        }
    }

    /// Items in this window, in repository order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of matching records across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// One-based page number this window represents.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Page count derived from [`Page::total`] and [`Page::per_page`].
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Transform every item while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}
