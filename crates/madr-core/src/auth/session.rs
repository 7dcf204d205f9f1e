use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{LoginResponse, User};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds as reported at login, if any.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn from_login(response: LoginResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            user: response.user,
            created_at: Utc::now(),
        }
    }

    /// Local expiry time. `None` when no lifetime was reported or the
    /// reported one does not fit a timestamp; the server's 401 ends such
    /// sessions instead.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let lifetime = Duration::try_seconds(self.expires_in?)?;
        self.created_at.checked_add_signed(lifetime)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|expiry| Utc::now() > expiry)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_at()
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
    }
}

#[derive(Debug)]
struct SessionInner {
    data: SessionData,
    revoked: AtomicBool,
}

/// The credential context handed to an `ApiClient`.
///
/// A new `Session` is created for every login. Once revoked (logout or a
/// 401 from the server) it never yields a token again; clones share the
/// revocation.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                data,
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// Bearer token, while the session is live.
    pub fn token(&self) -> Option<&str> {
        if self.is_valid() {
            Some(self.inner.data.access_token.as_str())
        } else {
            None
        }
    }

    pub fn user(&self) -> &User {
        &self.inner.data.user
    }

    pub fn data(&self) -> &SessionData {
        &self.inner.data
    }

    pub fn revoke(&self) {
        if !self.inner.revoked.swap(true, Ordering::SeqCst) {
            info!(user = %self.inner.data.user.username, "Session revoked");
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::SeqCst)
    }

    /// Check if session is valid (not revoked and not expired)
    pub fn is_valid(&self) -> bool {
        !self.is_revoked() && !self.inner.data.is_expired()
    }
}

/// Disk persistence for the last login, so the console survives restarts.
pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load a still-valid session from disk
    pub fn load(&self) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;

        if data.is_expired() {
            debug!("Stored session has expired");
            return Ok(None);
        }
        Ok(Some(data))
    }

    /// Save session to disk
    pub fn save(&self, data: &SessionData) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Clear session data
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}
