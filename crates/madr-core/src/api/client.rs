//! HTTP client for the madr REST API.
//!
//! `ApiClient` owns the connection pool, the base URL and the request
//! timeout. Credentials come from an explicit `Session` installed with
//! `with_session`; there is no ambient token state.

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::Session;
use crate::config::Config;

use super::ApiError;

/// What to do with the current session when the server answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnauthorizedPolicy {
    /// Revoke the session so later requests go out without credentials.
    #[default]
    ClearSession,
    /// Leave the session alone (public pages that never log in).
    Ignore,
}

/// API client for the madr backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
    unauthorized_policy: UnauthorizedPolicy,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.as_ref().is_some_and(Session::is_valid))
            .field("unauthorized_policy", &self.unauthorized_policy)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the configured base URL and timeout.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session: None,
            unauthorized_policy: UnauthorizedPolicy::default(),
        })
    }

    /// Create a new ApiClient carrying `session`, sharing the connection pool.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            session: Some(session),
            unauthorized_policy: self.unauthorized_policy,
        }
    }

    /// Same pool, no credentials.
    pub fn without_session(&self) -> Self {
        Self {
            session: None,
            ..self.clone()
        }
    }

    pub fn with_unauthorized_policy(mut self, policy: UnauthorizedPolicy) -> Self {
        self.unauthorized_policy = policy;
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_valid)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.session.as_ref().and_then(Session::token) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into `ApiError::Status`.
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        debug!(%method, path, "API request");
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "API transport error");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }
        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        warn!(%method, path, status = status.as_u16(), error = %error, "API error response");
        Err(error)
    }

    fn handle_unauthorized(&self) {
        if self.unauthorized_policy == UnauthorizedPolicy::ClearSession {
            if let Some(ref session) = self.session {
                session.revoke();
            }
        }
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(Method::GET, path, builder).await?;
        Self::decode(path, response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(path, response).await
    }

    /// POST without a body, parameters in the query string.
    pub async fn post_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).query(query);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(path, response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.send(Method::PUT, path, builder).await?;
        Self::decode(path, response).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, builder).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).multipart(form);
        let response = self.send(Method::POST, path, builder).await?;
        Self::decode(path, response).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let builder = self.request(Method::PUT, path).multipart(form);
        let response = self.send(Method::PUT, path, builder).await?;
        Self::decode(path, response).await
    }
}
