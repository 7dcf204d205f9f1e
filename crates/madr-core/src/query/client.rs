use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::ApiError;

use super::QueryKey;

/// Outcome of a cached query. Errors are shared between every caller that
/// joined the same request, hence the `Arc`.
pub type QueryResult<T> = Result<Arc<T>, Arc<ApiError>>;

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, Arc<ApiError>>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a stored value stays fresh. `None` keeps it fresh until the
    /// key is invalidated.
    pub stale_time: Option<Duration>,
}

impl QueryOptions {
    pub fn stale_after(stale_time: Duration) -> Self {
        Self {
            stale_time: Some(stale_time),
        }
    }
}

/// Point-in-time view of an entry, for rendering stale data while a
/// refetch is pending.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub value: Option<Arc<T>>,
    pub is_fresh: bool,
    pub is_fetching: bool,
    pub error: Option<Arc<ApiError>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Snapshot<T> {
    /// "just now", "5m ago", "2h ago", "3d ago".
    pub fn age_display(&self) -> Option<String> {
        let minutes = (Utc::now() - self.updated_at?).num_minutes();
        Some(if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        })
    }
}

struct InFlight {
    seq: u64,
    fetch: SharedFetch,
}

struct Entry {
    type_id: TypeId,
    value: Option<AnyValue>,
    refreshed: Option<Instant>,
    updated_at: Option<DateTime<Utc>>,
    invalidated: bool,
    stale_time: Option<Duration>,
    last_applied_seq: u64,
    // Completions of requests issued before this sequence were started
    // before the last invalidation and may not mark the entry fresh.
    min_fresh_seq: u64,
    in_flight: Option<InFlight>,
    last_error: Option<Arc<ApiError>>,
}

impl Entry {
    fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            value: None,
            refreshed: None,
            updated_at: None,
            invalidated: false,
            stale_time: None,
            last_applied_seq: 0,
            min_fresh_seq: 0,
            in_flight: None,
            last_error: None,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        if self.value.is_none() || self.invalidated {
            return false;
        }
        match (self.stale_time, self.refreshed) {
            (None, _) => true,
            (Some(stale_time), Some(refreshed)) => now.duration_since(refreshed) < stale_time,
            (Some(_), None) => false,
        }
    }
}

#[derive(Default)]
struct State {
    entries: HashMap<QueryKey, Entry>,
    // Global, so sequence numbers also increase per key and never repeat
    // after `clear`.
    next_seq: u64,
}

/// Shared, cloneable handle to the query cache.
#[derive(Clone, Default)]
pub struct QueryClient {
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.lock().entries.len())
            .finish()
    }
}

enum Plan<T> {
    Hit(Arc<T>),
    Await(u64, SharedFetch),
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Bookkeeping never panics half-way, so a poisoned lock still
        // holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `key` if fresh, join the request already
    /// in flight for it, or start `fetch`.
    ///
    /// The returned value is the one this caller's request produced. It is
    /// written to the cache only if no later-issued request has completed
    /// first. `fetch` is called with the cache locked and must not touch
    /// this client synchronously.
    pub async fn get<T, F, Fut>(&self, key: &QueryKey, options: QueryOptions, fetch: F) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let plan = self.plan(key, options, false, fetch);
        self.run(key, plan).await
    }

    /// Start a new request for `key` even if the entry is fresh or a
    /// request is already in flight.
    pub async fn refetch<T, F, Fut>(&self, key: &QueryKey, options: QueryOptions, fetch: F) -> QueryResult<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let plan = self.plan(key, options, true, fetch);
        self.run(key, plan).await
    }

    fn plan<T, F, Fut>(&self, key: &QueryKey, options: QueryOptions, force: bool, fetch: F) -> Plan<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut guard = self.lock();
        let state = &mut *guard;
        let type_id = TypeId::of::<T>();
        let entry = state
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(type_id));

        if entry.type_id != type_id {
            warn!(%key, "Cache key reused with a different value type, discarding entry");
            *entry = Entry::new(type_id);
        }
        entry.stale_time = options.stale_time;

        if !force {
            if entry.is_fresh(Instant::now()) {
                if let Some(value) = entry.value.clone().and_then(|v| v.downcast::<T>().ok()) {
                    debug!(%key, "Query cache hit");
                    return Plan::Hit(value);
                }
            }
            if let Some(ref in_flight) = entry.in_flight {
                debug!(%key, seq = in_flight.seq, "Joining in-flight query");
                return Plan::Await(in_flight.seq, in_flight.fetch.clone());
            }
        }

        state.next_seq += 1;
        let seq = state.next_seq;
        debug!(%key, seq, "Starting query");
        let fetch: SharedFetch = fetch()
            .map(|result| match result {
                Ok(value) => Ok(Arc::new(value) as AnyValue),
                Err(e) => Err(Arc::new(e)),
            })
            .boxed()
            .shared();
        entry.in_flight = Some(InFlight {
            seq,
            fetch: fetch.clone(),
        });
        Plan::Await(seq, fetch)
    }

    async fn run<T: Send + Sync + 'static>(&self, key: &QueryKey, plan: Plan<T>) -> QueryResult<T> {
        let (seq, fetch) = match plan {
            Plan::Hit(value) => return Ok(value),
            Plan::Await(seq, fetch) => (seq, fetch),
        };
        let result = fetch.await;
        self.complete(key, seq, &result);
        let value = result?;
        value.downcast::<T>().map_err(|_| {
            Arc::new(ApiError::InvalidResponse(format!(
                "cached value for {} has an unexpected type",
                key
            )))
        })
    }

    fn complete(&self, key: &QueryKey, seq: u64, result: &Result<AnyValue, Arc<ApiError>>) {
        let mut state = self.lock();
        let Some(entry) = state.entries.get_mut(key) else {
            debug!(%key, seq, "Query finished after the cache was cleared");
            return;
        };
        if entry.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
            entry.in_flight = None;
        }
        if seq <= entry.last_applied_seq {
            debug!(%key, seq, applied = entry.last_applied_seq, "Discarding superseded query result");
            return;
        }
        entry.last_applied_seq = seq;

        match result {
            Ok(value) => {
                entry.value = Some(Arc::clone(value));
                entry.refreshed = Some(Instant::now());
                entry.updated_at = Some(Utc::now());
                entry.last_error = None;
                entry.invalidated = seq < entry.min_fresh_seq;
                if entry.invalidated {
                    debug!(%key, seq, "Stored result issued before invalidation, entry stays stale");
                }
            }
            Err(e) => {
                debug!(%key, seq, error = %e, "Query failed, keeping previous value");
                entry.last_error = Some(Arc::clone(e));
            }
        }
    }

    /// Mark every entry under `prefix` stale and detach its in-flight
    /// request from future callers. Data is kept. Returns the number of
    /// entries touched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut guard = self.lock();
        let State { entries, next_seq } = &mut *guard;
        let mut count = 0;
        for (_, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            entry.invalidated = true;
            entry.in_flight = None;
            entry.min_fresh_seq = *next_seq + 1;
            count += 1;
        }
        debug!(%prefix, count, "Invalidated queries");
        count
    }

    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Snapshot<T>> {
        let state = self.lock();
        let entry = state.entries.get(key)?;
        if entry.type_id != TypeId::of::<T>() {
            return None;
        }
        Some(Snapshot {
            value: entry.value.clone().and_then(|v| v.downcast::<T>().ok()),
            is_fresh: entry.is_fresh(Instant::now()),
            is_fetching: entry.in_flight.is_some(),
            error: entry.last_error.clone(),
            updated_at: entry.updated_at,
        })
    }

    /// Drop every entry, e.g. on logout.
    pub fn clear(&self) {
        let mut state = self.lock();
        debug!(entries = state.entries.len(), "Clearing query cache");
        state.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
