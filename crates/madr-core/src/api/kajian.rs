//! Kajian (lecture video) accessors.

use crate::models::{Kajian, RecentVideos, SyncResponse, YoutubeVideo};

use super::envelope::{Envelope, Page, PageQuery};
use super::{ApiClient, ApiError};

const PUBLIC_PATH: &str = "/kajian";
const ADMIN_PATH: &str = "/admin/kajian";
const RECENT_VIDEOS_PATH: &str = "/youtube/kajian";

/// Look-back window for a channel sync when none is given.
pub const DEFAULT_SYNC_DAYS: u32 = 30;

pub struct KajianApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn kajian(&self) -> KajianApi<'_> {
        KajianApi { client: self }
    }
}

impl KajianApi<'_> {
    pub async fn list(&self, query: &PageQuery) -> Result<Page<Kajian>, ApiError> {
        self.client.get(PUBLIC_PATH, &query.paging_params()).await
    }

    pub async fn get(&self, id: i64) -> Result<Kajian, ApiError> {
        let envelope: Envelope<Kajian> = self
            .client
            .get(&format!("{}/{}", PUBLIC_PATH, id), &[])
            .await?;
        envelope.into_data("kajian")
    }

    /// Videos from the last 30 days, read live from the channel rather
    /// than from stored kajian.
    pub async fn recent_videos(&self) -> Result<Vec<YoutubeVideo>, ApiError> {
        let feed: RecentVideos = self.client.get(RECENT_VIDEOS_PATH, &[]).await?;
        Ok(feed.data)
    }

    /// Pull videos published in the last `days` days from YouTube.
    pub async fn sync(&self, days: u32) -> Result<SyncResponse, ApiError> {
        self.client
            .post_query(&format!("{}/sync", ADMIN_PATH), &[("days", days.to_string())])
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", ADMIN_PATH, id)).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::client_for;

    #[tokio::test]
    async fn test_sync_passes_days() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/kajian/sync"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Sync completed", "synced": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server.uri()).kajian().sync(7).await.expect("sync ok");
        assert_eq!(resp.synced, 2);
    }

    #[tokio::test]
    async fn test_recent_videos_null_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/kajian"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": null, "total": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let videos = client_for(&server.uri())
            .kajian()
            .recent_videos()
            .await
            .expect("feed loads");
        assert!(videos.is_empty());
    }
}
