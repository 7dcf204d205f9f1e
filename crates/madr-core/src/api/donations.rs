//! Donation accessors. Everything but the public summary needs a session.

use crate::models::{
    CreateDonationRequest, Donation, DonationCategory, DonationSummary, PaymentStatus,
    UpdateDonationRequest,
};
use crate::validation::CheckRequest;

use super::envelope::{Envelope, Page, PageQuery};
use super::{ApiClient, ApiError};

const ADMIN_PATH: &str = "/admin/donations";
const CATEGORIES_PATH: &str = "/admin/donation-categories";
const SUMMARY_PATH: &str = "/donations/summary";

pub struct DonationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn donations(&self) -> DonationsApi<'_> {
        DonationsApi { client: self }
    }
}

impl DonationsApi<'_> {
    /// List donations; `query.filter` is the payment status, if any.
    pub async fn list(&self, query: &PageQuery) -> Result<Page<Donation>, ApiError> {
        self.client.get(ADMIN_PATH, &query.params("status")).await
    }

    pub async fn list_by_status(
        &self,
        limit: u32,
        offset: u32,
        status: Option<PaymentStatus>,
    ) -> Result<Page<Donation>, ApiError> {
        let query = PageQuery::new(limit, offset).with_filter(status.map(|s| s.to_string()));
        self.list(&query).await
    }

    pub async fn get(&self, id: i64) -> Result<Donation, ApiError> {
        let envelope: Envelope<Donation> = self
            .client
            .get(&format!("{}/{}", ADMIN_PATH, id), &[])
            .await?;
        envelope.into_data("donation")
    }

    pub async fn create(&self, request: &CreateDonationRequest) -> Result<Donation, ApiError> {
        request.check()?;
        let envelope: Envelope<Donation> = self.client.post(ADMIN_PATH, request).await?;
        envelope.into_data("donation")
    }

    pub async fn update(&self, id: i64, request: &UpdateDonationRequest) -> Result<Donation, ApiError> {
        request.check()?;
        let envelope: Envelope<Donation> = self
            .client
            .put(&format!("{}/{}", ADMIN_PATH, id), request)
            .await?;
        envelope.into_data("donation")
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", ADMIN_PATH, id)).await
    }

    /// Totals of successful donations, as shown on the public site.
    pub async fn summary(&self) -> Result<DonationSummary, ApiError> {
        let envelope: Envelope<DonationSummary> = self.client.get(SUMMARY_PATH, &[]).await?;
        envelope.into_data("donation summary")
    }

    /// All donation categories. A missing payload means no categories.
    pub async fn categories(&self) -> Result<Vec<DonationCategory>, ApiError> {
        let envelope: Envelope<Vec<DonationCategory>> = self.client.get(CATEGORIES_PATH, &[]).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::{client_for, session};

    fn donation_json(id: i64) -> serde_json::Value {
        let donor = (id % 2 == 1).then_some("Hamba Allah");
        let amount = 100_000.0 * id as f64;
        serde_json::json!({
            "id": id,
            "category_id": 1,
            "donor_name": donor,
            "amount": amount,
            "message": "",
            "payment_status": "success",
            "created_at": "2026-03-01T00:00:00Z",
            "category": {"id": 1, "name": "Infaq", "description": ""}
        })
    }

    #[tokio::test]
    async fn test_status_filter_is_sent() {
        let server = MockServer::start().await;
        let items: Vec<serde_json::Value> = (1..=7).map(donation_json).collect();
        Mock::given(method("GET"))
            .and(path("/admin/donations"))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "0"))
            .and(query_param("status", "success"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": items, "total": 7, "limit": 10, "offset": 0, "total_pages": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server.uri())
            .with_session(session("t"))
            .donations()
            .list_by_status(10, 0, Some(PaymentStatus::Success))
            .await
            .expect("donations load");
        assert_eq!(page.items.len(), 7);
        assert!(!page.has_pagination());
    }

    #[tokio::test]
    async fn test_categories_missing_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/donation-categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
            .mount(&server)
            .await;

        let categories = client_for(&server.uri())
            .donations()
            .categories()
            .await
            .expect("categories load");
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn test_summary_reads_public_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/donations/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "total_amount": 1_500_000.0,
                    "total_transactions": 12,
                    "per_category": [
                        {"category_id": 1, "category": "Infaq", "amount": 1_000_000.0},
                        {"category_id": 2, "category": "Zakat", "amount": 500_000.0}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server.uri())
            .donations()
            .summary()
            .await
            .expect("summary loads");
        assert_eq!(summary.total_transactions, 12);
        assert_eq!(summary.per_category.len(), 2);
        assert_eq!(summary.per_category[1].name, "Zakat");
    }

    #[tokio::test]
    async fn test_summary_without_data_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/donations/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .donations()
            .summary()
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingData(_)));
    }
}
