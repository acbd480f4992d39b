//! Seam between the cache engine and whatever serves result pages.

use async_trait::async_trait;

use crate::{Error, LinkCollector, Query};

/// Pagination metadata reported by one page of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub total: u64,
    pub last_page: u32,
}

/// Fetches one page of search results.
///
/// Implementations append the page's item identifiers to `links` and return
/// the response's pagination metadata verbatim.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, query: &Query, links: &LinkCollector) -> Result<PageMeta, Error>;
}
