use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use madr_core::models::LoginRequest;
use madr_core::{
    ApiClient, Config, MutationController, Notification, NotificationKind, QueryClient, Session,
    SessionStore,
};

/// Undelivered notifications kept between prints.
const NOTIFICATION_CAPACITY: usize = 32;

/// Everything a command needs: configuration, the API client for the
/// current session, the query cache and the mutation controller.
pub struct App {
    pub config: Config,
    store: SessionStore,
    anonymous: ApiClient,
    client: ApiClient,
    pub cache: QueryClient,
    pub mutations: MutationController,
    notifications: mpsc::Receiver<Notification>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let store = SessionStore::new(config.cache_dir()?);
        let anonymous = ApiClient::new(&config).context("Failed to create HTTP client")?;

        let client = match store.load() {
            Ok(Some(data)) => {
                info!(user = %data.user.username, "Restored saved session");
                anonymous.with_session(Session::new(data))
            }
            Ok(None) => anonymous.clone(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                anonymous.clone()
            }
        };

        let cache = QueryClient::new();
        let (mutations, notifications) =
            MutationController::with_channel(cache.clone(), NOTIFICATION_CAPACITY);

        Ok(Self {
            config,
            store,
            anonymous,
            client,
            cache,
            mutations,
            notifications,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fail early for admin commands when nobody is logged in.
    pub fn require_login(&self) -> Result<()> {
        if self.client.is_authenticated() {
            Ok(())
        } else {
            anyhow::bail!("Not logged in. Run `madr login` first.")
        }
    }

    pub async fn login(&mut self, username: &str, password: String) -> Result<()> {
        let request = LoginRequest {
            username: username.trim().to_string(),
            password,
        };
        let data = self
            .anonymous
            .auth()
            .login(&request)
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;

        self.store.save(&data)?;
        if let Some(session) = self.client.session() {
            session.revoke();
        }
        println!("Logged in as {}", data.user.display_name());
        self.client = self.anonymous.with_session(Session::new(data));
        self.cache.clear();

        self.config.last_username = Some(request.username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to remember username");
        }
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.client.session() {
            session.revoke();
        }
        self.client = self.anonymous.clone();
        self.cache.clear();
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Called after every command: a 401 revokes the in-memory session, so
    /// drop the saved copy too.
    pub fn sync_session(&mut self) -> Result<()> {
        let revoked = self.client.session().is_some_and(Session::is_revoked);
        if revoked {
            self.store.clear()?;
            self.client = self.anonymous.clone();
            self.cache.clear();
            eprintln!("Session expired. Run `madr login` to sign in again.");
        }
        Ok(())
    }

    pub fn flush_notifications(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            match notification.kind {
                NotificationKind::Success => println!("✓ {}", notification.message),
                NotificationKind::Error => eprintln!("✗ {}", notification.message),
            }
        }
    }
}
