//! Display helpers shared by the front-ends.

pub mod format;

pub use format::{format_date, format_rupiah, resolve_media_url, truncate};
