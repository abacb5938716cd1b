//! Pagination helpers for Cloud Controller listings
//!
//! Cloud Controller v3 listings are 1-indexed and carry a `pagination`
//! block with a `next` link that is `null` on the last page. The `next`
//! link is the only exhaustion signal; `total_pages` is for display.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ResourceFetcher, fetch_resource};
use crate::error::Result;

/// Largest page size the Cloud Controller accepts.
pub const MAX_PAGE_SIZE: usize = 5000;

/// Pagination parameters for a listing request.
///
/// # Example
/// ```ignore
/// let params = PaginationParams::new().per_page(100).page(2);
/// assert_eq!(params.apply("/v3/apps"), "/v3/apps?per_page=100&page=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationParams {
    /// Number of resources per page
    pub per_page: usize,
    /// Page number, starting at 1
    pub page: usize,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            per_page: MAX_PAGE_SIZE,
            page: 1,
        }
    }
}

impl PaginationParams {
    /// Create new pagination params with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn per_page(mut self, size: usize) -> Self {
        self.per_page = size;
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Convert to query string parameters.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }

    /// Append the query parameters to a resource path.
    pub fn apply(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        let query = self
            .to_query_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}{}", path, separator, query)
    }
}

/// Response metadata for paginated results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Total number of resources across all pages
    #[serde(default)]
    pub total_results: Option<usize>,

    /// Total number of pages (advisory)
    #[serde(default)]
    pub total_pages: Option<usize>,

    /// Link to the next page, `null` on the last page
    #[serde(default)]
    pub next: Option<Value>,
}

impl PaginationMeta {
    /// Check if there are more pages to fetch.
    pub fn has_next_page(&self) -> bool {
        !matches!(self.next, None | Some(Value::Null))
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The resources on this page
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,

    /// Pagination metadata
    #[serde(default)]
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Check if there are more pages to fetch.
    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next_page()
    }
}

/// A page delivered by [`Paginator::next_page`].
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Page number, starting at 1
    pub number: usize,
    /// Advisory page count reported by the platform
    pub total_pages: Option<usize>,
    /// Resources in platform order
    pub resources: Vec<T>,
}

/// Lazy, single-pass walk over every page of a listing.
///
/// Pages are fetched one at a time on demand. Once the last page has been
/// delivered, or a fetch has failed, the paginator is finished and yields
/// nothing more.
pub struct Paginator<'a, T> {
    fetcher: &'a dyn ResourceFetcher,
    path: String,
    per_page: usize,
    next: Option<usize>,
    total_pages: Option<usize>,
    _resource: std::marker::PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    /// Start paginating `path` from page 1.
    pub fn new(fetcher: &'a dyn ResourceFetcher, path: impl Into<String>, per_page: usize) -> Self {
        Self {
            fetcher,
            path: path.into(),
            per_page,
            next: Some(1),
            total_pages: None,
            _resource: std::marker::PhantomData,
        }
    }

    /// Page number the next call will request, if any.
    pub fn upcoming_page(&self) -> Option<usize> {
        self.next
    }

    /// Advisory total page count from the most recent response.
    pub fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the listing is exhausted. An empty page whose
    /// `next` link is present does not end the walk.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let Some(number) = self.next.take() else {
            return Ok(None);
        };

        let params = PaginationParams::new().per_page(self.per_page).page(number);
        let response: PaginatedResponse<T> =
            fetch_resource(self.fetcher, &params.apply(&self.path)).await?;

        self.total_pages = response.pagination.total_pages;
        if response.has_next_page() {
            self.next = Some(number + 1);
        }

        Ok(Some(Page {
            number,
            total_pages: self.total_pages,
            resources: response.resources,
        }))
    }
}
