use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Page size used by every `list_all` helper.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Paging metadata in the nested `meta.page` format.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub page: Page,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub total: u64,
    /// Largest page size the endpoint accepts, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<u64>,
}

/// A page of results with its metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Collects every page of an offset/limit listing.
///
/// `fetch(offset, limit)` is called starting at offset 0, advancing by
/// `limit`, until a page shorter than `limit` comes back. The first error
/// aborts the walk.
pub async fn collect_pages<T, F, Fut>(limit: usize, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let limit = limit.max(1);
    let mut offset = 0usize;
    let mut items = Vec::new();

    loop {
        let page = fetch(offset, limit).await?;
        let page_len = page.len();
        items.extend(page);

        #[cfg(feature = "tracing")]
        tracing::debug!(offset, limit, page_len, total = items.len(), "fetched page");

        if page_len < limit {
            return Ok(items);
        }
        offset += limit;
    }
}
