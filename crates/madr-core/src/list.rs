//! Paginated list view state.
//!
//! A [`ListController`] tracks which page and filter a list view shows and
//! which request it is waiting for. Every page, filter or reload change
//! hands out a [`FetchTicket`]; only the result for the newest ticket is
//! applied, so a slow response for an old page or filter can never replace
//! what the user asked for last.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::api::{ApiError, Page, PageQuery};
use crate::query::{QueryClient, QueryKey, QueryOptions, QueryResult};

#[derive(Debug, Clone)]
pub enum ListState<T> {
    Idle,
    /// Waiting for a page. `previous` is the page shown before, kept on
    /// screen during page changes and reloads.
    Loading { previous: Option<Arc<Page<T>>> },
    Loaded(Arc<Page<T>>),
    Error(String),
}

/// One request started by a [`ListController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: PageQuery,
    pub key: QueryKey,
}

#[derive(Debug)]
pub struct ListController<T> {
    resource: &'static str,
    page: u32,
    limit: u32,
    filter: Option<String>,
    generation: u64,
    state: ListState<T>,
}

/// Cache key for one page of `resource`: `[resource, limit, offset]`,
/// plus the filter when set.
pub fn page_key(resource: &'static str, query: &PageQuery) -> QueryKey {
    let key = QueryKey::new(resource).push(query.limit).push(query.offset);
    match query.filter {
        Some(ref filter) => key.push(filter.as_str()),
        None => key,
    }
}

impl<T> ListController<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(resource: &'static str, limit: u32) -> Self {
        Self {
            resource,
            page: 1,
            limit: limit.max(1),
            filter: None,
            generation: 0,
            state: ListState::Idle,
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::for_page(self.page, self.limit).with_filter(self.filter.clone())
    }

    fn begin(&mut self, keep_previous: bool) -> FetchTicket {
        self.generation += 1;
        let previous = if keep_previous {
            match std::mem::replace(&mut self.state, ListState::Idle) {
                ListState::Loaded(page) => Some(page),
                ListState::Loading { previous } => previous,
                ListState::Idle | ListState::Error(_) => None,
            }
        } else {
            None
        };
        self.state = ListState::Loading { previous };

        let query = self.query();
        let key = page_key(self.resource, &query);
        debug!(resource = self.resource, generation = self.generation, %key, "List request");
        FetchTicket {
            generation: self.generation,
            query,
            key,
        }
    }

    /// Move to `page` (1-based; 0 is treated as 1).
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.page = page.max(1);
        self.begin(true)
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let has_next = self.current().is_some_and(Page::has_next);
        has_next.then(|| self.set_page(self.page + 1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        (self.page > 1).then(|| self.set_page(self.page - 1))
    }

    /// Change the filter and go back to page 1. Rows for the old filter
    /// are not kept on screen.
    pub fn set_filter(&mut self, filter: Option<String>) -> FetchTicket {
        self.filter = filter.filter(|f| !f.trim().is_empty());
        self.page = 1;
        self.begin(false)
    }

    pub fn reload(&mut self) -> FetchTicket {
        self.begin(true)
    }

    /// Re-request the current page after a mutation has invalidated it.
    pub fn after_mutation(&mut self) -> FetchTicket {
        self.reload()
    }

    /// Apply the outcome of `ticket`. Returns `false`, leaving the state
    /// untouched, when a newer request has been started since.
    pub fn complete(&mut self, ticket: &FetchTicket, result: QueryResult<Page<T>>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                resource = self.resource,
                ticket = ticket.generation,
                current = self.generation,
                "Ignoring superseded list response"
            );
            return false;
        }
        self.state = match result {
            Ok(page) => ListState::Loaded(page),
            Err(e) => ListState::Error(e.user_message()),
        };
        true
    }

    /// Fetch the page for `ticket` through the cache. Does not borrow the
    /// controller, so several tickets can be in flight at once.
    pub async fn fetch<F, Fut>(cache: &QueryClient, ticket: &FetchTicket, fetch: F) -> QueryResult<Page<T>>
    where
        F: FnOnce(PageQuery) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'static,
    {
        let query = ticket.query.clone();
        cache
            .get(&ticket.key, QueryOptions::default(), move || fetch(query))
            .await
    }

    /// Reload the current page through the cache and apply the result.
    pub async fn load<F, Fut>(&mut self, cache: &QueryClient, fetch: F) -> bool
    where
        F: FnOnce(PageQuery) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>> + Send + 'static,
    {
        let ticket = self.reload();
        let result = Self::fetch(cache, &ticket, fetch).await;
        self.complete(&ticket, result)
    }

    /// Rows to display: the loaded page, or the previous one while loading.
    pub fn rows(&self) -> &[T] {
        match self.state {
            ListState::Loaded(ref page) => page.items.as_slice(),
            ListState::Loading {
                previous: Some(ref page),
            } => page.items.as_slice(),
            _ => &[],
        }
    }

    pub fn current(&self) -> Option<&Page<T>> {
        match self.state {
            ListState::Loaded(ref page) => Some(page.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self.state {
            ListState::Error(ref message) => Some(message),
            _ => None,
        }
    }

    pub fn show_pagination(&self) -> bool {
        self.current().is_some_and(Page::has_pagination)
    }

    /// Loaded with no rows at all.
    pub fn is_empty(&self) -> bool {
        self.current().is_some_and(Page::is_empty)
    }

    /// "Page 2 of 5", or `None` when pagination is hidden.
    pub fn page_label(&self) -> Option<String> {
        let page = self.current().filter(|p| p.has_pagination())?;
        Some(format!("Page {} of {}", page.current_page(), page.total_pages))
    }
}
