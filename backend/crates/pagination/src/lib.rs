//! Page-number pagination primitives shared by repositories and endpoints.
//!
//! A [`PageRequest`] describes which slice of an ordered collection a caller
//! wants (1-based page number, page size, optional sort). A [`Page`] is the
//! envelope the query layer hands back: the matched slice plus the metadata
//! clients need to render pagers (`total`, `total_pages`).
//!
//! Invariant: `total_pages` is always `ceil(total / limit)` for the limit the
//! page was built with, so concatenating pages `1..=total_pages` in order
//! yields exactly `total` items.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First page number; pages are 1-based.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size applied when the caller does not specify one.
pub const DEFAULT_LIMIT: u32 = 25;
/// Upper bound on the page size a single request may ask for.
pub const MAX_LIMIT: u32 = 100;

/// Direction applied when ordering by a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (the default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Lowercase wire token for the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field plus direction to order a result set by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Record field the store orders by.
    pub field: String,
    /// Direction of the ordering.
    pub order: SortOrder,
}

impl SortSpec {
    /// Build a sort descriptor, rejecting blank field names.
    ///
    /// # Examples
    /// ```
    /// use pagination::{SortOrder, SortSpec};
    ///
    /// let sort = SortSpec::new("created_at", SortOrder::Desc).expect("valid field");
    /// assert_eq!(sort.field, "created_at");
    /// ```
    pub fn new(field: impl Into<String>, order: SortOrder) -> Result<Self, PageRequestError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(PageRequestError::EmptySortField);
        }
        Ok(Self { field, order })
    }

    /// Convenience constructor for ascending order.
    pub fn ascending(field: impl Into<String>) -> Result<Self, PageRequestError> {
        Self::new(field, SortOrder::Asc)
    }

    /// Convenience constructor for descending order.
    pub fn descending(field: impl Into<String>) -> Result<Self, PageRequestError> {
        Self::new(field, SortOrder::Desc)
    }
}

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers are 1-based.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds the service cap.
    #[error("page size must not exceed {max}")]
    LimitTooLarge {
        /// The configured maximum page size.
        max: u32,
    },
    /// Sort fields must not be blank.
    #[error("sort field must not be empty")]
    EmptySortField,
}

/// Validated description of the slice a caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    sort: Option<SortSpec>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: None,
        }
    }
}

impl PageRequest {
    /// Build a request for the given 1-based page and page size.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(3, 10).expect("valid request");
    /// assert_eq!(request.offset(), 20);
    /// ```
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self {
            page,
            limit,
            sort: None,
        })
    }

    /// Attach a sort descriptor to the request.
    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Requested 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requested ordering, if any.
    #[must_use]
    pub const fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Zero-based row offset of the first item on the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// One slice of an ordered result set plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The matched slice, in store order.
    pub items: Vec<T>,
    /// 1-based page number this slice corresponds to.
    pub page: u32,
    /// Page size the slice was cut with.
    pub limit: u32,
    /// Total number of matching records across all pages.
    pub total: u64,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page, deriving `total_pages` from `total` and `limit`.
    ///
    /// A `limit` of zero yields zero pages rather than dividing by zero;
    /// validated [`PageRequest`] values never produce one.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            items,
            page,
            limit,
            total,
            total_pages,
        }
    }

    /// An empty page with zero matches.
    #[must_use]
    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), page, limit, 0)
    }

    /// Map the items into another representation, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
