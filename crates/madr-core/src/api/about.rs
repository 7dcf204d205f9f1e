//! About-content accessors. There is a single record.

use crate::models::{AboutContent, UpdateAboutRequest};
use crate::validation::CheckRequest;

use super::envelope::Envelope;
use super::{ApiClient, ApiError};

const PUBLIC_PATH: &str = "/about";
const ADMIN_PATH: &str = "/admin/about";

pub struct AboutApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn about(&self) -> AboutApi<'_> {
        AboutApi { client: self }
    }
}

impl AboutApi<'_> {
    pub async fn fetch(&self) -> Result<AboutContent, ApiError> {
        let envelope: Envelope<AboutContent> = self.client.get(ADMIN_PATH, &[]).await?;
        envelope.into_data("about")
    }

    /// Public read. `None` when nothing has been written yet (404 or an
    /// empty envelope), so the site can show its default text.
    pub async fn fetch_public(&self) -> Result<Option<AboutContent>, ApiError> {
        match self.client.get::<Envelope<AboutContent>>(PUBLIC_PATH, &[]).await {
            Ok(envelope) => Ok(envelope.data),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update(&self, request: &UpdateAboutRequest) -> Result<AboutContent, ApiError> {
        request.check()?;
        let envelope: Envelope<AboutContent> = self.client.put(ADMIN_PATH, request).await?;
        envelope.into_data("about")
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::client_for;

    #[tokio::test]
    async fn test_public_about_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "About not found"})))
            .mount(&server)
            .await;

        let about = client_for(&server.uri())
            .about()
            .fetch_public()
            .await
            .expect("404 is not an error");
        assert!(about.is_none());
    }

    #[tokio::test]
    async fn test_admin_about_with_bare_image_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/about"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"id": 1, "title": "Tentang", "image_url": "masjid.jpg", "years_active": 20}
            })))
            .mount(&server)
            .await;

        let about = client_for(&server.uri())
            .about()
            .fetch()
            .await
            .expect("about loads");
        assert_eq!(about.images(), vec!["masjid.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_public_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).about().fetch_public().await.unwrap_err();
        assert_eq!(err.user_message(), "Server error, please try again");
    }
}
