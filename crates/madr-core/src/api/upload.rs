//! Standalone file upload used by the image pickers.

use reqwest::multipart::{Form, Part};

use crate::models::{UploadFile, UploadResponse};

use super::envelope::Envelope;
use super::{ApiClient, ApiError};

const UPLOAD_PATH: &str = "/admin/upload";

/// Multipart part for a file, with its name and content type.
pub(crate) fn media_part(file: &UploadFile) -> Result<Part, ApiError> {
    let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    Ok(match file.content_type {
        Some(ref mime) => part.mime_str(mime)?,
        None => part,
    })
}

pub struct UploadApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn uploads(&self) -> UploadApi<'_> {
        UploadApi { client: self }
    }
}

impl UploadApi<'_> {
    /// Upload a file and return its public URL.
    pub async fn upload(&self, file: &UploadFile) -> Result<String, ApiError> {
        let form = Form::new().part("file", media_part(file)?);
        let envelope: Envelope<UploadResponse> = self.client.post_multipart(UPLOAD_PATH, form).await?;
        let response = envelope.into_data("upload")?;
        response
            .resolved_url()
            .map(str::to_string)
            .ok_or(ApiError::MissingData("upload url"))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::test_support::client_for;

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "File uploaded successfully",
                "data": {"filename": "a1b2.png", "url": "http://localhost:8080/uploads/a1b2.png"}
            })))
            .mount(&server)
            .await;

        let url = client_for(&server.uri())
            .uploads()
            .upload(&UploadFile::new("logo.png", vec![1, 2, 3]))
            .await
            .expect("upload ok");
        assert_eq!(url, "http://localhost:8080/uploads/a1b2.png");
    }

    #[tokio::test]
    async fn test_upload_without_url_is_missing_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"filename": "a1b2.png"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .uploads()
            .upload(&UploadFile::new("logo.png", vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingData("upload url")));
    }
}
