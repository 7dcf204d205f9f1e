//! Credential login.

use tracing::info;

use crate::auth::SessionData;
use crate::models::{LoginRequest, LoginResponse};
use crate::validation::CheckRequest;

use super::envelope::Envelope;
use super::{ApiClient, ApiError};

const LOGIN_PATH: &str = "/auth/login";

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Exchange credentials for a session. The caller wraps the result in a
    /// `Session` and installs it with `ApiClient::with_session`.
    pub async fn login(&self, request: &LoginRequest) -> Result<SessionData, ApiError> {
        request.check()?;
        let envelope: Envelope<LoginResponse> = self.client.post(LOGIN_PATH, request).await?;
        match envelope.data {
            Some(response) => {
                info!(user = %response.user.username, "Login successful");
                Ok(SessionData::from_login(response))
            }
            None => Err(ApiError::Rejected(
                envelope.error.unwrap_or_else(|| "Login failed".to_string()),
            )),
        }
    }
}
