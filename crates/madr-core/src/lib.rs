//! Core library for the madr content console.
//!
//! Shared by every front-end:
//! - `api`: HTTP client, response envelopes and per-resource accessors
//! - `auth`: the explicit session passed to the client, and its persistence
//! - `query`: key-addressed cache with request deduplication
//! - `list`: paginated list view state
//! - `mutation`: writes with cache invalidation and notifications
//! - `models`, `validation`, `config`, `utils`

pub mod api;
pub mod auth;
pub mod config;
pub mod list;
pub mod models;
pub mod mutation;
pub mod query;
pub mod utils;
pub mod validation;

pub use api::{ApiClient, ApiError, Page, PageQuery};
pub use auth::{Session, SessionData, SessionStore};
pub use config::Config;
pub use list::{FetchTicket, ListController, ListState};
pub use mutation::{Mutation, MutationController, Notification, NotificationKind};
pub use query::{QueryClient, QueryKey, QueryOptions};
