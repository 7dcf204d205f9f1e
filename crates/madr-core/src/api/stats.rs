//! Dashboard counts.
//!
//! The backend has no stats endpoint, so the counts are read from the
//! `total` of a one-row page of each collection. A failed leg counts as 0
//! rather than failing the whole dashboard.

use serde::Deserialize;
use tracing::debug;

use crate::models::DashboardStats;

use super::{ApiClient, ApiError};

const COUNT_PARAMS: [(&str, &str); 2] = [("limit", "1"), ("offset", "0")];

#[derive(Debug, Deserialize)]
struct TotalOnly {
    #[serde(default)]
    total: u64,
}

pub struct StatsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn stats(&self) -> StatsApi<'_> {
        StatsApi { client: self }
    }
}

impl StatsApi<'_> {
    async fn count(&self, path: &str) -> u64 {
        let params: Vec<(&str, String)> = COUNT_PARAMS
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        match self.client.get::<TotalOnly>(path, &params).await {
            Ok(page) => page.total,
            Err(e) => {
                debug!(path, error = %e, "Count request failed, using 0");
                0
            }
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        let (total_events, total_banners, total_gallery, total_donations) = futures::join!(
            self.count("/events"),
            self.count("/banners"),
            self.count("/gallery"),
            self.count("/admin/donations"),
        );
        Ok(DashboardStats {
            total_events,
            total_banners,
            total_gallery,
            total_donations,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::client_for;

    async fn mount_total(server: &MockServer, route: &str, total: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [], "total": total, "limit": 1, "offset": 0, "total_pages": total
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_failed_leg_counts_as_zero() {
        let server = MockServer::start().await;
        mount_total(&server, "/events", 12).await;
        mount_total(&server, "/banners", 3).await;
        mount_total(&server, "/gallery", 40).await;
        Mock::given(method("GET"))
            .and(path("/admin/donations"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let stats = client_for(&server.uri())
            .stats()
            .dashboard()
            .await
            .expect("stats never fail");
        assert_eq!(
            stats,
            DashboardStats {
                total_events: 12,
                total_banners: 3,
                total_gallery: 40,
                total_donations: 0,
            }
        );
    }
}
