//! Authentication module for managing the admin session.
//!
//! This module provides:
//! - `Session`: the token context passed to `ApiClient`, revoked on logout or 401
//! - `SessionStore`: persistence of the last login in the cache directory

pub mod session;

pub use session::{Session, SessionData, SessionStore};
