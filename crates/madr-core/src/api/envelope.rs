//! Response envelopes used by every endpoint.
//!
//! Single resources come wrapped as `{ data?, message?, error? }`; lists use
//! the paginated form `{ data, total, limit, offset, total_pages }`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, failing with `MissingData` when the server
    /// omitted it.
    pub fn into_data(self, what: &'static str) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData(what))
    }
}

/// Offset/limit request for a page of a collection, with an optional
/// filter value (e.g. donation `status`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
    pub filter: Option<String>,
}

impl PageQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            filter: None,
        }
    }

    /// Query for a 1-based page number.
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self::new(limit, page.saturating_sub(1).saturating_mul(limit))
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.trim().is_empty());
        self
    }

    /// `limit` and `offset` only, for collections without a filter.
    pub fn paging_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }

    /// Query string pairs; `filter_param` names the filter on the wire.
    pub fn params(&self, filter_param: &'static str) -> Vec<(&'static str, String)> {
        let mut params = self.paging_params();
        if let Some(ref filter) = self.filter {
            params.push((filter_param, filter.clone()));
        }
        params
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct WirePage<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    data: Vec<T>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    limit: u32,
    #[serde(default)]
    offset: u32,
    #[serde(default)]
    total_pages: u32,
}

// The backend serialises an empty slice as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page of a collection. Immutable once decoded; the next fetch
/// produces a new page instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub total_pages: u32,
}

/// `ceil(total / limit)`, with zero pages for an empty collection or a
/// zero limit.
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
}

impl<T> Page<T> {
    /// Build a page, enforcing `items.len() <= limit` and
    /// `total_pages == ceil(total / limit)`.
    pub fn new(mut items: Vec<T>, total: u64, limit: u32, offset: u32) -> Self {
        if limit > 0 && items.len() > limit as usize {
            warn!(
                items = items.len(),
                limit, "Page holds more items than its limit, truncating"
            );
            items.truncate(limit as usize);
        }
        Self {
            items,
            total,
            limit,
            offset,
            total_pages: page_count(total, limit),
        }
    }

    pub fn empty(limit: u32) -> Self {
        Self::new(Vec::new(), 0, limit, 0)
    }

    /// 1-based index of this page.
    pub fn current_page(&self) -> u32 {
        if self.limit == 0 {
            1
        } else {
            self.offset / self.limit + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pagination controls are only shown when there is more than one page.
    pub fn has_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page() < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page() > 1
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = WirePage::<T>::deserialize(deserializer)?;
        let page = Page::new(wire.data, wire.total, wire.limit, wire.offset);
        if page.total_pages != wire.total_pages {
            warn!(
                server = wire.total_pages,
                computed = page.total_pages,
                "Server total_pages disagrees with total/limit"
            );
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(7, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_page_deserialize_recomputes_total_pages() {
        let json = r#"{"data":[1,2,3],"total":23,"limit":3,"offset":3,"total_pages":1}"#;
        let page: Page<i32> = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.total_pages, 8);
        assert_eq!(page.current_page(), 2);
        assert!(page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_page_zero_total() {
        let json = r#"{"data":[],"total":0,"limit":10,"offset":0,"total_pages":0}"#;
        let page: Page<i32> = serde_json::from_str(json).expect("valid page");
        assert_eq!(page.total_pages, 0);
        assert!(page.is_empty());
        assert!(!page.has_pagination());
    }

    #[test]
    fn test_page_truncates_to_limit() {
        let page = Page::new(vec![1, 2, 3, 4], 4, 2, 0);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_page_null_data_is_empty() {
        let json = r#"{"data":null,"total":0,"limit":10,"offset":0}"#;
        let page: Page<i32> = serde_json::from_str(json).expect("valid page");
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_envelope_missing_data() {
        let env: Envelope<i32> = serde_json::from_str(r#"{"message":"ok"}"#).expect("valid");
        assert!(matches!(env.into_data("event"), Err(ApiError::MissingData("event"))));
    }

    #[test]
    fn test_page_query_for_page_and_filter() {
        let q = PageQuery::for_page(3, 10).with_filter(Some("success".into()));
        assert_eq!(q.offset, 20);
        assert_eq!(
            q.params("status"),
            vec![
                ("limit", "10".to_string()),
                ("offset", "20".to_string()),
                ("status", "success".to_string())
            ]
        );
        assert_eq!(PageQuery::for_page(0, 10).offset, 0);
        assert!(PageQuery::default().with_filter(Some(" ".into())).filter.is_none());
    }
}
