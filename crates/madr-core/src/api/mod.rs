//! REST API client module for the madr content backend.
//!
//! `ApiClient` is the single transport; each resource has a borrowing
//! accessor (`client.events()`, `client.donations()`, ...) that maps typed
//! requests onto endpoints and unwraps the response envelope.
//!
//! Reads of public content go to `/{collection}`, writes and admin-only
//! reads to `/admin/{collection}`, authenticated with a bearer token.

pub mod about;
pub mod auth;
pub mod banners;
pub mod client;
pub mod contact;
pub mod donations;
pub mod envelope;
pub mod error;
pub mod events;
pub mod gallery;
pub mod kajian;
pub mod stats;
pub mod upload;

pub use client::{ApiClient, UnauthorizedPolicy};
pub use envelope::{page_count, Envelope, Page, PageQuery};
pub use error::ApiError;
