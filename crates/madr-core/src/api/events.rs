//! Event accessors. Reads use the public collection, writes the admin one.

use crate::models::{CreateEventRequest, Event, UpdateEventRequest};
use crate::validation::CheckRequest;

use super::envelope::{Envelope, Page, PageQuery};
use super::{ApiClient, ApiError};

const PUBLIC_PATH: &str = "/events";
const ADMIN_PATH: &str = "/admin/events";

pub struct EventsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn events(&self) -> EventsApi<'_> {
        EventsApi { client: self }
    }
}

impl EventsApi<'_> {
    pub async fn list(&self, query: &PageQuery) -> Result<Page<Event>, ApiError> {
        self.client.get(PUBLIC_PATH, &query.paging_params()).await
    }

    pub async fn get(&self, id: i64) -> Result<Event, ApiError> {
        let envelope: Envelope<Event> = self
            .client
            .get(&format!("{}/{}", PUBLIC_PATH, id), &[])
            .await?;
        envelope.into_data("event")
    }

    pub async fn create(&self, request: &CreateEventRequest) -> Result<Event, ApiError> {
        request.check()?;
        let envelope: Envelope<Event> = self.client.post(ADMIN_PATH, request).await?;
        envelope.into_data("event")
    }

    pub async fn update(&self, id: i64, request: &UpdateEventRequest) -> Result<Event, ApiError> {
        request.check()?;
        let envelope: Envelope<Event> = self
            .client
            .put(&format!("{}/{}", ADMIN_PATH, id), request)
            .await?;
        envelope.into_data("event")
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", ADMIN_PATH, id)).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::{client_for, session};

    fn event_json(id: i64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "description": "",
            "date": "2026-04-01T19:30:00Z",
            "location": "Aula",
            "created_at": "2026-03-01T00:00:00Z",
            "updated_at": "2026-03-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_events_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(query_param("limit", "10"))
            .and(query_param("offset", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [event_json(11, "Kajian Ahad"), event_json(12, "Tabligh Akbar")],
                "total": 12, "limit": 10, "offset": 10, "total_pages": 2
            })))
            .mount(&server)
            .await;

        let page = client_for(&server.uri())
            .events()
            .list(&PageQuery::for_page(2, 10))
            .await
            .expect("page loads");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.current_page(), 2);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_create_event_posts_to_admin() {
        let server = MockServer::start().await;
        let request = CreateEventRequest {
            title: "Kajian Ahad".into(),
            description: "Fiqih".into(),
            date: Utc.with_ymd_and_hms(2026, 4, 1, 19, 30, 0).unwrap(),
            location: "Aula".into(),
        };
        Mock::given(method("POST"))
            .and(path("/admin/events"))
            .and(body_json(serde_json::to_value(&request).unwrap()))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "data": event_json(5, "Kajian Ahad"),
                "message": "created"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let event = client_for(&server.uri())
            .with_session(session("t"))
            .events()
            .create(&request)
            .await
            .expect("event created");
        assert_eq!(event.id, 5);
    }

    #[tokio::test]
    async fn test_create_event_missing_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "ok"})))
            .mount(&server)
            .await;

        let request = CreateEventRequest {
            title: "Kajian".into(),
            description: String::new(),
            date: Utc::now(),
            location: String::new(),
        };
        let err = client_for(&server.uri()).events().create(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingData("event")));
    }

    #[tokio::test]
    async fn test_invalid_event_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let request = CreateEventRequest {
            title: "  ".into(),
            description: String::new(),
            date: Utc::now(),
            location: String::new(),
        };
        let err = client_for(&server.uri()).events().create(&request).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert_eq!(errors.for_field("title"), Some("Title is required"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
