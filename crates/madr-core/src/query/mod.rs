//! In-memory query cache shared by every view.
//!
//! Entries are addressed by a segmented [`QueryKey`] such as
//! `events/10/0`. The [`QueryClient`] deduplicates concurrent requests for a
//! key, serves fresh entries without I/O and lets mutations mark whole
//! families of keys stale by prefix.
//!
//! Each fetch is tagged with a sequence number. A completion is applied only
//! when it is newer than whatever the entry already holds, so a slow early
//! request can never overwrite the result of a later one.

pub mod client;
pub mod key;

pub use client::{QueryClient, QueryOptions, QueryResult, Snapshot};
pub use key::{KeySegment, QueryKey};
