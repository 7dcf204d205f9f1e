//! Create/update/delete execution with cache invalidation and
//! user notifications.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiError;
use crate::query::{QueryClient, QueryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message for the user, e.g. a toast or a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Description of a write: which cache keys it affects and what to tell
/// the user afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    name: &'static str,
    invalidates: Vec<QueryKey>,
    success_text: String,
    failure_text: Option<String>,
}

impl Mutation {
    /// A mutation of `resource`; every cached page of it is invalidated on
    /// success.
    pub fn new(name: &'static str, resource: &'static str) -> Self {
        Self {
            name,
            invalidates: vec![QueryKey::new(resource)],
            success_text: "Saved".to_string(),
            failure_text: None,
        }
    }

    pub fn also_invalidate(mut self, key: QueryKey) -> Self {
        self.invalidates.push(key);
        self
    }

    pub fn success_text(mut self, text: impl Into<String>) -> Self {
        self.success_text = text.into();
        self
    }

    pub fn failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = Some(text.into());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invalidates(&self) -> &[QueryKey] {
        &self.invalidates
    }

    fn failure_message(&self, error: &ApiError) -> String {
        if let Some(message) = error.server_message() {
            return message.to_string();
        }
        if let ApiError::Validation(errors) = error {
            return errors.to_string();
        }
        self.failure_text
            .clone()
            .unwrap_or_else(|| error.generic_message())
    }

    // Counted on the dashboard, so creates and deletes also refresh stats.
    fn counted(name: &'static str, resource: &'static str) -> Self {
        Self::new(name, resource).also_invalidate(QueryKey::new("stats"))
    }

    pub fn create_event() -> Self {
        Self::counted("create_event", "events")
            .success_text("Event created successfully")
            .failure_text("Failed to create event")
    }

    pub fn update_event(id: i64) -> Self {
        Self::new("update_event", "events")
            .also_invalidate(QueryKey::new("event").push(id))
            .success_text("Event updated successfully")
            .failure_text("Failed to update event")
    }

    pub fn delete_event() -> Self {
        Self::counted("delete_event", "events")
            .success_text("Event deleted successfully")
            .failure_text("Failed to delete event")
    }

    pub fn create_banner() -> Self {
        Self::counted("create_banner", "banners")
            .success_text("Banner created successfully")
            .failure_text("Failed to save banner")
    }

    pub fn update_banner(id: i64) -> Self {
        Self::new("update_banner", "banners")
            .also_invalidate(QueryKey::new("banner").push(id))
            .success_text("Banner updated successfully")
            .failure_text("Failed to save banner")
    }

    pub fn delete_banner() -> Self {
        Self::counted("delete_banner", "banners")
            .success_text("Banner deleted successfully")
            .failure_text("Failed to delete banner")
    }

    pub fn create_gallery_item() -> Self {
        Self::counted("create_gallery_item", "gallery")
            .success_text("Gallery item created successfully")
            .failure_text("Failed to create gallery item")
    }

    pub fn delete_gallery_item() -> Self {
        Self::counted("delete_gallery_item", "gallery")
            .success_text("Gallery item deleted successfully")
            .failure_text("Failed to delete gallery item")
    }

    pub fn create_donation() -> Self {
        Self::counted("create_donation", "donations")
            .success_text("Donation created successfully")
            .failure_text("Failed to create donation")
    }

    pub fn update_donation(id: i64) -> Self {
        Self::new("update_donation", "donations")
            .also_invalidate(QueryKey::new("donation").push(id))
            .success_text("Donation updated successfully")
            .failure_text("Failed to update donation")
    }

    pub fn delete_donation() -> Self {
        Self::counted("delete_donation", "donations")
            .success_text("Donation deleted successfully")
            .failure_text("Failed to delete donation")
    }

    pub fn update_about() -> Self {
        Self::new("update_about", "about")
            .success_text("About content saved")
            .failure_text("Failed to save about content")
    }

    pub fn sync_kajian() -> Self {
        Self::new("sync_kajian", "kajian")
            .success_text("Kajian synced successfully")
            .failure_text("Failed to sync kajian")
    }

    pub fn delete_kajian() -> Self {
        Self::new("delete_kajian", "kajian")
            .success_text("Kajian deleted successfully")
            .failure_text("Failed to delete kajian")
    }
}

/// Runs mutations against a shared [`QueryClient`] and reports each
/// outcome on a notification channel.
#[derive(Debug, Clone)]
pub struct MutationController {
    cache: QueryClient,
    notifications: mpsc::Sender<Notification>,
}

impl MutationController {
    pub fn new(cache: QueryClient, notifications: mpsc::Sender<Notification>) -> Self {
        Self {
            cache,
            notifications,
        }
    }

    /// Controller plus the receiving end of a channel holding up to
    /// `capacity` undelivered notifications.
    pub fn with_channel(cache: QueryClient, capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(cache, tx), rx)
    }

    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    /// Await `action`. On success the mutation's keys are invalidated
    /// before this returns, so the next read refetches. On failure the
    /// cache is left alone.
    pub async fn execute<T, Fut>(&self, mutation: &Mutation, action: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match action.await {
            Ok(value) => {
                let invalidated: usize = mutation
                    .invalidates
                    .iter()
                    .map(|key| self.cache.invalidate(key))
                    .sum();
                info!(mutation = mutation.name, invalidated, "Mutation succeeded");
                self.notify(Notification::success(mutation.success_text.clone()));
                Ok(value)
            }
            Err(e) => {
                warn!(mutation = mutation.name, error = %e, "Mutation failed");
                self.notify(Notification::error(mutation.failure_message(&e)));
                Err(e)
            }
        }
    }

    fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifications.try_send(notification) {
            warn!(error = %e, "Dropping notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::query::QueryOptions;
    use crate::validation::ValidationErrors;

    async fn seed(cache: &QueryClient, keys: &[QueryKey]) {
        for key in keys {
            cache
                .get(key, QueryOptions::default(), || async { Ok::<_, ApiError>(0u8) })
                .await
                .expect("seed");
        }
    }

    fn fresh(cache: &QueryClient, key: &QueryKey) -> bool {
        cache.peek::<u8>(key).expect("seeded").is_fresh
    }

    fn keys() -> Vec<QueryKey> {
        vec![
            QueryKey::new("events").push(10u32).push(0u32),
            QueryKey::new("events").push(10u32).push(10u32),
            QueryKey::new("event").push(3i64),
            QueryKey::new("stats"),
            QueryKey::new("donations").push(10u32).push(0u32),
        ]
    }

    #[tokio::test]
    async fn test_create_invalidates_events_and_stats() {
        let cache = QueryClient::new();
        let keys = keys();
        seed(&cache, &keys).await;
        let (controller, mut rx) = MutationController::with_channel(cache.clone(), 8);

        let id = controller
            .execute(&Mutation::create_event(), async { Ok::<_, ApiError>(42) })
            .await
            .expect("created");
        assert_eq!(id, 42);

        let freshness: Vec<bool> = keys.iter().map(|k| fresh(&cache, k)).collect();
        assert_eq!(freshness, vec![false, false, true, false, true]);
        assert_eq!(
            rx.try_recv().expect("notified"),
            Notification::success("Event created successfully")
        );
    }

    #[tokio::test]
    async fn test_update_invalidates_single_event() {
        let cache = QueryClient::new();
        let keys = keys();
        seed(&cache, &keys).await;
        let (controller, _rx) = MutationController::with_channel(cache.clone(), 8);

        controller
            .execute(&Mutation::update_event(3), async { Ok::<_, ApiError>(()) })
            .await
            .expect("updated");
        let freshness: Vec<bool> = keys.iter().map(|k| fresh(&cache, k)).collect();
        assert_eq!(freshness, vec![false, false, false, true, true]);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_and_reports_server_message() {
        let cache = QueryClient::new();
        let keys = keys();
        seed(&cache, &keys).await;
        let (controller, mut rx) = MutationController::with_channel(cache.clone(), 8);

        let err = controller
            .execute(&Mutation::delete_event(), async {
                Err::<(), _>(ApiError::from_status(
                    StatusCode::CONFLICT,
                    r#"{"error":"Event has registrations"}"#,
                ))
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(keys.iter().all(|k| fresh(&cache, k)));
        assert_eq!(
            rx.try_recv().expect("notified"),
            Notification::error("Event has registrations")
        );
    }

    #[tokio::test]
    async fn test_failure_without_server_message_uses_failure_text() {
        let (controller, mut rx) = MutationController::with_channel(QueryClient::new(), 8);
        let _ = controller
            .execute(&Mutation::delete_donation(), async {
                Err::<(), _>(ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>"))
            })
            .await;
        assert_eq!(rx.try_recv().expect("notified").message, "Failed to delete donation");

        let bare = Mutation::new("touch", "events");
        let _ = controller
            .execute(&bare, async {
                Err::<(), _>(ApiError::from_status(StatusCode::BAD_GATEWAY, ""))
            })
            .await;
        assert_eq!(
            rx.try_recv().expect("notified").message,
            "Server error, please try again"
        );
    }

    #[tokio::test]
    async fn test_validation_failure_is_reported_verbatim() {
        let (controller, mut rx) = MutationController::with_channel(QueryClient::new(), 8);
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        let _ = controller
            .execute(&Mutation::create_event(), async move {
                Err::<(), _>(ApiError::Validation(errors))
            })
            .await;
        assert_eq!(rx.try_recv().expect("notified").message, "Title is required");
    }

    #[tokio::test]
    async fn test_closed_channel_is_not_fatal() {
        let (controller, rx) = MutationController::with_channel(QueryClient::new(), 1);
        drop(rx);
        let value = controller
            .execute(&Mutation::sync_kajian(), async { Ok::<_, ApiError>(3) })
            .await
            .expect("still succeeds");
        assert_eq!(value, 3);
    }
}
